//! Origin service access.
//!
//! The gateway is a pure consumer of the origin's existing API. Three calls
//! are made, all authorized by the share key alone:
//!
//! ```text
//! GET api/shared-links/me?key={key}                    -> SharedLink
//! GET api/albums/{id}?key={key}                        -> Album
//! GET api/assets/{id}/thumbnail?size={size}&key={key}  -> image bytes
//! ```

mod client;
pub mod types;

pub use client::{
    normalize_base_url, AssetPayload, AssetSize, AssetStream, ImmichClient, OriginClient,
};
pub use types::{Album, Asset, AssetKind, ExifInfo, Owner, ShareKind, SharedLink};
