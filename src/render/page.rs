//! Data handed to the gallery template.

use crate::share::ResolvedShare;

/// Title used when the share is not an album.
pub const DEFAULT_PAGE_TITLE: &str = "Immich Gallery";

/// One rendered gallery page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryPage {
    pub title: String,
    pub preview_urls: Vec<String>,
    pub thumbnail_urls: Vec<String>,
    pub is_album: bool,
    pub album_description: Option<String>,
    pub album_asset_count: Option<u64>,
}

impl GalleryPage {
    /// Build the page for a resolved share.
    ///
    /// Album shares are titled after the album unless its name is blank.
    pub fn from_resolved(resolved: ResolvedShare, default_title: &str) -> Self {
        let ResolvedShare {
            preview_urls,
            thumbnail_urls,
            album,
        } = resolved;

        match album {
            Some(album) => {
                let title = if album.name.trim().is_empty() {
                    default_title.to_string()
                } else {
                    album.name
                };
                Self {
                    title,
                    preview_urls,
                    thumbnail_urls,
                    is_album: true,
                    album_description: album.description,
                    album_asset_count: Some(album.asset_count),
                }
            }
            None => Self {
                title: default_title.to_string(),
                preview_urls,
                thumbnail_urls,
                is_album: false,
                album_description: None,
                album_asset_count: None,
            },
        }
    }

    /// Preview and thumbnail URL pairs, in display order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.preview_urls
            .iter()
            .zip(&self.thumbnail_urls)
            .map(|(p, t)| (p.as_str(), t.as_str()))
    }
}
