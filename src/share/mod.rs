//! Share resolution and asset URL rewriting.
//!
//! Clients never see origin URLs. Each displayable asset is republished as
//! two gateway-local URLs that carry the asset id and the original share key:
//!
//! ```text
//! /asset/{asset_id}?key={share_key}                  (preview)
//! /asset/{asset_id}?key={share_key}&thumbnail=true   (thumbnail)
//! ```

mod resolver;

pub use resolver::{preview_url, thumbnail_url, AlbumSummary, ResolvedShare, ShareResolver};
