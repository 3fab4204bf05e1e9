//! HTTP client for the origin photo service.
//!
//! The share key doubles as the credential for every call: it is sent as the
//! `key` query parameter and the origin decides what it grants access to.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::OriginError;

use super::types::{Album, SharedLink};

/// Endpoint labels used in error context and logs.
const SHARE_ENDPOINT: &str = "shared-links/me";
const ALBUM_ENDPOINT: &str = "albums";
const ASSET_ENDPOINT: &str = "assets/thumbnail";

// =============================================================================
// Asset Payload
// =============================================================================

/// Which rendition of an asset to pull from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSize {
    /// Small square used in the grid
    Thumbnail,
    /// Large rendition shown when an image is opened
    Preview,
}

impl AssetSize {
    pub fn from_thumbnail_flag(want_thumbnail: bool) -> Self {
        if want_thumbnail {
            AssetSize::Thumbnail
        } else {
            AssetSize::Preview
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSize::Thumbnail => "thumbnail",
            AssetSize::Preview => "preview",
        }
    }
}

/// Body stream of an asset rendition.
pub type AssetStream = BoxStream<'static, Result<Bytes, OriginError>>;

/// An asset rendition as returned by the origin, not yet read.
pub struct AssetPayload {
    /// Content type the origin declared, if any
    pub content_type: Option<String>,

    /// Content length the origin declared, if any
    pub content_length: Option<u64>,

    /// The raw bytes, streamed
    pub body: AssetStream,
}

impl std::fmt::Debug for AssetPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPayload")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// OriginClient Trait
// =============================================================================

/// Read-only access to the origin service.
///
/// Implementations must report any non-200 answer as
/// [`OriginError::Status`] and undecodable JSON as [`OriginError::Decode`].
#[async_trait]
pub trait OriginClient: Send + Sync {
    /// Look up the shared link that `key` identifies.
    async fn fetch_share(&self, key: &str) -> Result<SharedLink, OriginError>;

    /// Fetch an album, including its asset list, using the share key.
    async fn fetch_album(&self, album_id: &str, key: &str) -> Result<Album, OriginError>;

    /// Start streaming one rendition of an asset.
    async fn fetch_asset(
        &self,
        asset_id: &str,
        key: &str,
        size: AssetSize,
    ) -> Result<AssetPayload, OriginError>;
}

// =============================================================================
// Immich Client
// =============================================================================

/// `reqwest`-backed client for an Immich server.
#[derive(Clone)]
pub struct ImmichClient {
    http: Client,
    base_url: Url,
}

impl ImmichClient {
    /// Create a client rooted at `base_url`.
    ///
    /// A missing trailing slash is added so API paths nest beneath the base
    /// rather than replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self, OriginError> {
        let http = Client::builder()
            .user_agent(concat!("share-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Create a client with a preconfigured `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, OriginError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `api/shared-links/me?key=...`
    pub fn share_url(&self, key: &str) -> Result<Url, OriginError> {
        let mut url = self.api_url(&["shared-links", "me"])?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }

    /// `api/albums/{id}?key=...`
    pub fn album_url(&self, album_id: &str, key: &str) -> Result<Url, OriginError> {
        let mut url = self.api_url(&["albums", album_id])?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }

    /// `api/assets/{id}/thumbnail?size=...&key=...`
    pub fn asset_url(&self, asset_id: &str, key: &str, size: AssetSize) -> Result<Url, OriginError> {
        let mut url = self.api_url(&["assets", asset_id, "thumbnail"])?;
        url.query_pairs_mut()
            .append_pair("size", size.as_str())
            .append_pair("key", key);
        Ok(url)
    }

    /// Probe the base address; used by the `check` command.
    pub async fn ping(&self) -> Result<u16, OriginError> {
        let response = self.http.get(self.base_url.clone()).send().await?;
        Ok(response.status().as_u16())
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, OriginError> {
        // `extend` collapses dot segments, which would change the endpoint
        if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(OriginError::InvalidUrl(format!(
                "invalid path segment '{}'",
                segment
            )));
        }

        let mut url = self
            .base_url
            .join("api/")
            .map_err(|e| OriginError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| OriginError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_ok(&self, url: Url, endpoint: &'static str) -> Result<reqwest::Response, OriginError> {
        debug!(endpoint, path = url.path(), "Fetching from origin");
        let response = self.http.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(OriginError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &'static str,
    ) -> Result<T, OriginError> {
        let body = self.get_ok(url, endpoint).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| OriginError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl OriginClient for ImmichClient {
    async fn fetch_share(&self, key: &str) -> Result<SharedLink, OriginError> {
        self.get_json(self.share_url(key)?, SHARE_ENDPOINT).await
    }

    async fn fetch_album(&self, album_id: &str, key: &str) -> Result<Album, OriginError> {
        self.get_json(self.album_url(album_id, key)?, ALBUM_ENDPOINT)
            .await
    }

    async fn fetch_asset(
        &self,
        asset_id: &str,
        key: &str,
        size: AssetSize,
    ) -> Result<AssetPayload, OriginError> {
        let response = self
            .get_ok(self.asset_url(asset_id, key, size)?, ASSET_ENDPOINT)
            .await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let content_length = response.content_length();

        let body = response.bytes_stream().map_err(OriginError::from).boxed();

        Ok(AssetPayload {
            content_type,
            content_length,
            body,
        })
    }
}

/// Empty, `.` and `..` segments, including their percent-encoded forms.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = urlencoding::decode(segment)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    matches!(decoded.as_str(), "" | "." | "..")
}

/// Parse the configured base address and make sure it ends in `/`.
pub fn normalize_base_url(base_url: &str) -> Result<Url, OriginError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| OriginError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(OriginError::InvalidUrl(base_url.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
