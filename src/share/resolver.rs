//! Share resolution: share key in, gateway-local gallery URLs out.
//!
//! # Flow
//!
//! ```text
//! resolve(key)
//!   │
//!   ├─ fetch_share(key) ──────────────┐
//!   │                                 ▼
//!   │                     ┌───────────────────────┐
//!   │                     │ kind?                 │
//!   │                     ├───────────────────────┤
//!   │      INDIVIDUAL ◄───┤ assets embedded       │
//!   │      ALBUM ─────────┤ fetch_album(id, key)  │
//!   │      other ─────────┤ UnknownShareType      │
//!   │                     └───────────────────────┘
//!   │
//!   ├─ keep IMAGE assets, in origin order
//!   └─ /asset/{id}?key={key}  and  /asset/{id}?key={key}&thumbnail=true
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::ShareError;
use crate::origin::{Album, Asset, OriginClient, ShareKind};

// =============================================================================
// Rewritten URLs
// =============================================================================

/// Gateway-local URL for the large rendition of an asset.
pub fn preview_url(asset_id: &str, share_key: &str) -> String {
    format!(
        "/asset/{}?key={}",
        urlencoding::encode(asset_id),
        urlencoding::encode(share_key)
    )
}

/// Gateway-local URL for the grid thumbnail of an asset.
pub fn thumbnail_url(asset_id: &str, share_key: &str) -> String {
    format!("{}&thumbnail=true", preview_url(asset_id, share_key))
}

// =============================================================================
// Resolved Share
// =============================================================================

/// Album details surfaced for album shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSummary {
    pub name: String,
    pub description: Option<String>,
    pub asset_count: u64,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        let description = Some(album.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Self {
            name: album.album_name.clone(),
            description,
            asset_count: album.asset_count,
        }
    }
}

/// Everything the page renderer needs for one share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedShare {
    /// One entry per displayable asset, in origin order
    pub preview_urls: Vec<String>,

    /// Parallel to `preview_urls`
    pub thumbnail_urls: Vec<String>,

    /// Present only for album shares
    pub album: Option<AlbumSummary>,
}

impl ResolvedShare {
    /// Build URL lists for the image assets in `assets`, skipping the rest.
    pub fn from_assets<'a>(assets: impl IntoIterator<Item = &'a Asset>, share_key: &str) -> Self {
        let (preview_urls, thumbnail_urls) = assets
            .into_iter()
            .filter(|asset| asset.kind.is_displayable())
            .map(|asset| {
                (
                    preview_url(&asset.id, share_key),
                    thumbnail_url(&asset.id, share_key),
                )
            })
            .unzip();

        Self {
            preview_urls,
            thumbnail_urls,
            album: None,
        }
    }

    pub fn is_album(&self) -> bool {
        self.album.is_some()
    }

    pub fn len(&self) -> usize {
        self.preview_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preview_urls.is_empty()
    }
}

// =============================================================================
// Share Resolver
// =============================================================================

/// Resolves share keys against the origin.
///
/// Holds no state beyond the client; every call goes to the origin afresh.
pub struct ShareResolver<O> {
    origin: Arc<O>,
}

impl<O> Clone for ShareResolver<O> {
    fn clone(&self) -> Self {
        Self {
            origin: Arc::clone(&self.origin),
        }
    }
}

impl<O: OriginClient> ShareResolver<O> {
    pub fn new(origin: Arc<O>) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Arc<O> {
        &self.origin
    }

    /// Resolve `share_key` into preview and thumbnail URLs.
    ///
    /// Individual shares use the assets embedded in the share. Album shares
    /// ignore any embedded assets and fetch the album once; the album summary
    /// in the share never carries the asset list.
    pub async fn resolve(&self, share_key: &str) -> Result<ResolvedShare, ShareError> {
        let share = self
            .origin
            .fetch_share(share_key)
            .await
            .map_err(ShareError::ShareFetch)?;

        match share.kind {
            ShareKind::Individual => {
                let resolved = ResolvedShare::from_assets(&share.assets, share_key);
                debug!(
                    kind = "INDIVIDUAL",
                    assets = share.assets.len(),
                    images = resolved.len(),
                    "Resolved share"
                );
                Ok(resolved)
            }
            ShareKind::Album => {
                let album_ref = share.album.as_ref().ok_or(ShareError::MissingAlbumData)?;

                let album = self
                    .origin
                    .fetch_album(&album_ref.id, share_key)
                    .await
                    .map_err(ShareError::AlbumFetch)?;

                let mut resolved = ResolvedShare::from_assets(&album.assets, share_key);
                resolved.album = Some(AlbumSummary::from(&album));
                debug!(
                    kind = "ALBUM",
                    album_id = %album.id,
                    assets = album.assets.len(),
                    images = resolved.len(),
                    "Resolved share"
                );
                Ok(resolved)
            }
            ShareKind::Unknown(kind) => Err(ShareError::UnknownShareType(kind)),
        }
    }
}
