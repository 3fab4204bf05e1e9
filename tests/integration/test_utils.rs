//! Test utilities for integration tests.
//!
//! Provides a mock origin with call tracking, a renderer that always fails,
//! and helpers for driving the router.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use share_gateway::error::{OriginError, RenderError};
use share_gateway::origin::{Album, AssetPayload, AssetSize, OriginClient, SharedLink};
use share_gateway::render::{GalleryPage, GalleryTemplate, PageRenderer};
use share_gateway::server::{create_router, RouterConfig};

// =============================================================================
// Mock Origin
// =============================================================================

/// One call the gateway made to the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginCall {
    Share { key: String },
    Album { album_id: String, key: String },
    Asset { asset_id: String, key: String, size: AssetSize },
}

/// What the mock answers for a share or album lookup.
#[derive(Debug, Clone)]
enum Reply {
    Json(String),
    Status(u16),
}

/// A stored asset with both renditions.
#[derive(Debug, Clone)]
struct MockAsset {
    content_type: Option<String>,
    thumbnail: Bytes,
    preview: Bytes,
    broken: bool,
}

/// An origin that serves pre-configured JSON and records every call.
///
/// Unknown keys and ids answer 404, the way the real origin rejects them.
pub struct MockOrigin {
    shares: HashMap<String, Reply>,
    albums: HashMap<String, Reply>,
    assets: HashMap<String, MockAsset>,
    unreachable: bool,
    calls: Arc<RwLock<Vec<OriginCall>>>,
}

impl MockOrigin {
    pub fn new() -> Self {
        Self {
            shares: HashMap::new(),
            albums: HashMap::new(),
            assets: HashMap::new(),
            unreachable: false,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_share(mut self, key: impl Into<String>, json: impl Into<String>) -> Self {
        self.shares.insert(key.into(), Reply::Json(json.into()));
        self
    }

    pub fn with_share_status(mut self, key: impl Into<String>, status: u16) -> Self {
        self.shares.insert(key.into(), Reply::Status(status));
        self
    }

    pub fn with_album(mut self, album_id: impl Into<String>, json: impl Into<String>) -> Self {
        self.albums.insert(album_id.into(), Reply::Json(json.into()));
        self
    }

    pub fn with_album_status(mut self, album_id: impl Into<String>, status: u16) -> Self {
        self.albums.insert(album_id.into(), Reply::Status(status));
        self
    }

    pub fn with_asset(
        mut self,
        asset_id: impl Into<String>,
        content_type: Option<&str>,
        thumbnail: &'static [u8],
        preview: &'static [u8],
    ) -> Self {
        self.assets.insert(
            asset_id.into(),
            MockAsset {
                content_type: content_type.map(str::to_string),
                thumbnail: Bytes::from_static(thumbnail),
                preview: Bytes::from_static(preview),
                broken: false,
            },
        );
        self
    }

    /// An asset whose body fails after the first chunk.
    pub fn with_broken_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.assets.insert(
            asset_id.into(),
            MockAsset {
                content_type: Some("image/jpeg".to_string()),
                thumbnail: Bytes::from_static(b"partial"),
                preview: Bytes::from_static(b"partial"),
                broken: true,
            },
        );
        self
    }

    /// Every call fails as if the origin were down.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub async fn calls(&self) -> Vec<OriginCall> {
        self.calls.read().await.clone()
    }

    pub async fn album_fetches(&self) -> Vec<OriginCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, OriginCall::Album { .. }))
            .collect()
    }

    async fn record(&self, call: OriginCall) -> Result<(), OriginError> {
        self.calls.write().await.push(call);
        if self.unreachable {
            return Err(OriginError::Request("connection refused".to_string()));
        }
        Ok(())
    }
}

impl Default for MockOrigin {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    reply: Option<&Reply>,
    endpoint: &'static str,
) -> Result<T, OriginError> {
    match reply {
        Some(Reply::Json(json)) => serde_json::from_str(json).map_err(|e| OriginError::Decode {
            endpoint,
            message: e.to_string(),
        }),
        Some(Reply::Status(status)) => Err(OriginError::Status {
            status: *status,
            endpoint,
        }),
        None => Err(OriginError::Status {
            status: 404,
            endpoint,
        }),
    }
}

#[async_trait]
impl OriginClient for MockOrigin {
    async fn fetch_share(&self, key: &str) -> Result<SharedLink, OriginError> {
        self.record(OriginCall::Share {
            key: key.to_string(),
        })
        .await?;
        decode(self.shares.get(key), "shared-links/me")
    }

    async fn fetch_album(&self, album_id: &str, key: &str) -> Result<Album, OriginError> {
        self.record(OriginCall::Album {
            album_id: album_id.to_string(),
            key: key.to_string(),
        })
        .await?;
        decode(self.albums.get(album_id), "albums")
    }

    async fn fetch_asset(
        &self,
        asset_id: &str,
        key: &str,
        size: AssetSize,
    ) -> Result<AssetPayload, OriginError> {
        self.record(OriginCall::Asset {
            asset_id: asset_id.to_string(),
            key: key.to_string(),
            size,
        })
        .await?;

        let asset = self.assets.get(asset_id).ok_or(OriginError::Status {
            status: 404,
            endpoint: "assets/thumbnail",
        })?;

        let data = match size {
            AssetSize::Thumbnail => asset.thumbnail.clone(),
            AssetSize::Preview => asset.preview.clone(),
        };
        let content_length = (!asset.broken).then_some(data.len() as u64);

        let body = if asset.broken {
            stream::iter(vec![
                Ok(data),
                Err(OriginError::Request("connection reset".to_string())),
            ])
            .boxed()
        } else {
            stream::iter(vec![Ok(data)]).boxed()
        };

        Ok(AssetPayload {
            content_type: asset.content_type.clone(),
            content_length,
            body,
        })
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// A renderer that always fails.
pub struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render(&self, _page: &GalleryPage) -> Result<String, RenderError> {
        Err(RenderError::Render("template exploded".to_string()))
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Router over `origin` with the bundled template and tracing off.
pub fn test_router<O: OriginClient + 'static>(origin: &Arc<O>) -> Router {
    let renderer = Arc::new(GalleryTemplate::builtin().unwrap());
    create_router(
        Arc::clone(origin),
        renderer,
        RouterConfig::default().with_tracing(false),
    )
}

/// Send a GET through the router.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

// =============================================================================
// Fixtures
// =============================================================================

/// Individual share with one image and one video.
pub const INDIVIDUAL_SHARE: &str =
    r#"{"type":"INDIVIDUAL","assets":[{"id":"a1","type":"IMAGE"},{"id":"a2","type":"VIDEO"}]}"#;

/// Album share whose embedded summary points at `alb-1`.
///
/// The embedded asset list is a decoy; album shares must use the album fetch.
pub const ALBUM_SHARE: &str = r#"{
    "id": "link-1",
    "key": "ak",
    "type": "ALBUM",
    "description": null,
    "expiresAt": null,
    "assets": [{"id": "decoy", "type": "IMAGE"}],
    "album": {"id": "alb-1", "albumName": "Lisbon", "assetCount": 3}
}"#;

/// The full album behind `ALBUM_SHARE`.
pub const ALBUM: &str = r#"{
    "id": "alb-1",
    "albumName": "Lisbon",
    "description": "Trams & tiles",
    "assetCount": 3,
    "assets": [
        {"id": "p1", "type": "IMAGE"},
        {"id": "m1", "type": "VIDEO"},
        {"id": "p2", "type": "IMAGE"}
    ]
}"#;
