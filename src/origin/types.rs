//! Typed records for the origin service's JSON payloads.
//!
//! Every field is defaulted so partial payloads decode; fields the origin
//! documents as nullable are `Option`s rather than placeholders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Kinds
// =============================================================================

/// What a shared link grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShareKind {
    /// A hand-picked set of assets embedded in the share itself
    Individual,
    /// A whole album, whose assets must be fetched separately
    Album,
    /// Anything else the origin might send
    Unknown(String),
}

impl ShareKind {
    pub fn as_str(&self) -> &str {
        match self {
            ShareKind::Individual => "INDIVIDUAL",
            ShareKind::Album => "ALBUM",
            ShareKind::Unknown(raw) => raw,
        }
    }
}

impl Default for ShareKind {
    fn default() -> Self {
        ShareKind::Unknown(String::new())
    }
}

impl From<String> for ShareKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "INDIVIDUAL" => ShareKind::Individual,
            "ALBUM" => ShareKind::Album,
            _ => ShareKind::Unknown(raw),
        }
    }
}

impl From<ShareKind> for String {
    fn from(kind: ShareKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ShareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media type of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Other,
    Unknown(String),
}

impl AssetKind {
    pub fn as_str(&self) -> &str {
        match self {
            AssetKind::Image => "IMAGE",
            AssetKind::Video => "VIDEO",
            AssetKind::Audio => "AUDIO",
            AssetKind::Other => "OTHER",
            AssetKind::Unknown(raw) => raw,
        }
    }

    /// Only still images are shown in the gallery.
    pub fn is_displayable(&self) -> bool {
        *self == AssetKind::Image
    }
}

impl Default for AssetKind {
    fn default() -> Self {
        AssetKind::Unknown(String::new())
    }
}

impl From<String> for AssetKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "IMAGE" => AssetKind::Image,
            "VIDEO" => AssetKind::Video,
            "AUDIO" => AssetKind::Audio,
            "OTHER" => AssetKind::Other,
            _ => AssetKind::Unknown(raw),
        }
    }
}

impl From<AssetKind> for String {
    fn from(kind: AssetKind) -> Self {
        kind.as_str().to_string()
    }
}

// =============================================================================
// Shared Link
// =============================================================================

/// Response of `api/shared-links/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharedLink {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ShareKind,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: String,
    pub allow_download: bool,
    pub allow_upload: bool,
    pub show_metadata: bool,
    pub password: Option<String>,
    /// Only meaningful for individual shares
    pub assets: Vec<Asset>,
    /// Summary of the album for album shares; carries no assets
    pub album: Option<Album>,
}

// =============================================================================
// Album
// =============================================================================

/// Response of `api/albums/{id}`, also embedded as a summary in album shares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    pub id: String,
    pub album_name: String,
    pub description: String,
    pub album_thumbnail_asset_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner_id: String,
    pub owner: Option<Owner>,
    pub shared: bool,
    pub has_shared_link: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub assets: Vec<Asset>,
    pub asset_count: u64,
    pub is_activity_enabled: bool,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Owner {
    pub id: String,
    pub email: String,
    pub name: String,
    pub profile_image_path: String,
    pub avatar_color: String,
    pub profile_changed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Asset
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub checksum: String,
    pub device_asset_id: String,
    pub device_id: String,
    pub duplicate_id: Option<String>,
    pub duration: Option<String>,
    pub exif_info: Option<ExifInfo>,
    pub file_created_at: Option<DateTime<Utc>>,
    pub file_modified_at: Option<DateTime<Utc>>,
    pub has_metadata: bool,
    pub is_archived: bool,
    pub is_favorite: bool,
    pub is_offline: bool,
    pub is_trashed: bool,
    pub library_id: Option<String>,
    pub live_photo_video_id: Option<String>,
    pub local_date_time: Option<DateTime<Utc>>,
    pub original_file_name: String,
    pub original_mime_type: Option<String>,
    pub original_path: String,
    pub owner_id: String,
    pub resized: bool,
    pub thumbhash: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub visibility: Option<String>,
}

/// Camera metadata; the origin may null out any of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExifInfo {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub date_time_original: Option<DateTime<Utc>>,
    pub modify_date: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub description: Option<String>,
    pub exif_image_height: Option<u32>,
    pub exif_image_width: Option<u32>,
    pub exposure_time: Option<String>,
    pub f_number: Option<f64>,
    pub file_size_in_byte: Option<u64>,
    pub focal_length: Option<f64>,
    pub iso: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub lens_model: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<String>,
    pub projection_type: Option<String>,
    pub rating: Option<i32>,
}
