//! HTTP request handlers for the share gateway.
//!
//! # Endpoints
//!
//! - `GET /share/{key}` - Render the gallery for a share
//! - `GET /asset/{id}?key=...[&thumbnail=true]` - Stream an asset rendition
//! - anything else - 404
//!
//! Origin failures never leak: unreachable or non-200 origins are a plain
//! 404 with a generic message, and the detail only goes to the log.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{OriginError, RenderError, ShareError};
use crate::origin::{AssetSize, OriginClient};
use crate::render::{GalleryPage, PageRenderer, DEFAULT_PAGE_TITLE};
use crate::share::ShareResolver;

/// Content type used when the origin does not declare one.
pub const DEFAULT_ASSET_CONTENT_TYPE: &str = "image/jpeg";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Everything here is read-only after startup.
pub struct AppState<O: OriginClient> {
    /// Resolves share keys; also owns the origin client
    pub resolver: ShareResolver<O>,

    /// Gallery page renderer, parsed once at startup
    pub renderer: Arc<dyn PageRenderer>,

    /// Title for pages that are not albums
    pub default_title: Arc<str>,
}

impl<O: OriginClient> AppState<O> {
    pub fn new(origin: Arc<O>, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            resolver: ShareResolver::new(origin),
            renderer,
            default_title: Arc::from(DEFAULT_PAGE_TITLE),
        }
    }

    pub fn with_default_title(mut self, title: impl AsRef<str>) -> Self {
        self.default_title = Arc::from(title.as_ref());
        self
    }

    pub fn origin(&self) -> &O {
        self.resolver.origin()
    }
}

impl<O: OriginClient> Clone for AppState<O> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            renderer: Arc::clone(&self.renderer),
            default_title: Arc::clone(&self.default_title),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for asset requests.
///
/// Parsed by hand so that odd query strings never turn into a 400: the first
/// occurrence of each parameter wins and anything unparseable is ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AssetQueryParams {
    /// Share key, forwarded to the origin as-is
    pub key: String,

    /// Whether the grid thumbnail rather than the preview is wanted
    pub thumbnail: bool,
}

impl AssetQueryParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut key = None;
        let mut thumbnail = None;

        for (name, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
            match name.as_ref() {
                "key" if key.is_none() => key = Some(value.into_owned()),
                "thumbnail" if thumbnail.is_none() => thumbnail = Some(value == "true"),
                _ => {}
            }
        }

        Self {
            key: key.unwrap_or_default(),
            thumbnail: thumbnail.unwrap_or(false),
        }
    }

    pub fn size(&self) -> AssetSize {
        AssetSize::from_thumbnail_flag(self.thumbnail)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "internal_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Log an error at a level matching its status, then build the response.
///
/// `detail` goes to the log only; the body carries `public_message`.
fn error_response(
    status: StatusCode,
    error_type: &'static str,
    public_message: &'static str,
    detail: &dyn Display,
) -> Response {
    if status.is_server_error() {
        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            detail
        );
    } else {
        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Resource not found: {}",
            detail
        );
    }

    let body = ErrorResponse::with_status(error_type, public_message, status);
    (status, Json(body)).into_response()
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Failures of the gallery route.
#[derive(Debug)]
pub enum GalleryError {
    /// Path segment that does not decode; no share can match it
    BadKey(PathRejection),
    Share(ShareError),
    Render(RenderError),
}

impl From<ShareError> for GalleryError {
    fn from(err: ShareError) -> Self {
        GalleryError::Share(err)
    }
}

impl From<RenderError> for GalleryError {
    fn from(err: RenderError) -> Self {
        GalleryError::Render(err)
    }
}

/// Convert gallery errors to HTTP responses.
///
/// - undecodable key, origin unreachable or non-200 -> 404
/// - malformed payload, inconsistent share, render failure -> 500
impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        match &self {
            GalleryError::BadKey(err) => error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                "Share not found",
                err,
            ),
            GalleryError::Share(err) if err.is_not_found() => error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                "Share not found",
                err,
            ),
            GalleryError::Share(err) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "share_error",
                "Failed to load share",
                err,
            ),
            GalleryError::Render(err) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                "Failed to render gallery",
                err,
            ),
        }
    }
}

/// Failures of the asset route; every one is a 404.
#[derive(Debug)]
pub enum AssetError {
    BadId(PathRejection),
    Origin(OriginError),
}

impl From<OriginError> for AssetError {
    fn from(err: OriginError) -> Self {
        AssetError::Origin(err)
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        let detail: &dyn Display = match &self {
            AssetError::BadId(err) => err,
            AssetError::Origin(err) => err,
        };
        error_response(StatusCode::NOT_FOUND, "not_found", "Asset not found", detail)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle gallery requests.
///
/// # Endpoint
///
/// `GET /share/{key}`
///
/// # Response
///
/// - `200 OK`: `text/html` gallery page
/// - `404 Not Found`: origin rejected the key or could not be reached
/// - `500 Internal Server Error`: malformed origin payload, unknown share
///   structure, or template failure
pub async fn share_handler<O: OriginClient>(
    State(state): State<AppState<O>>,
    key: Result<Path<String>, PathRejection>,
) -> Result<Html<String>, GalleryError> {
    let Path(key) = key.map_err(GalleryError::BadKey)?;
    let resolved = state.resolver.resolve(&key).await?;
    let page = GalleryPage::from_resolved(resolved, &state.default_title);
    let html = state.renderer.render(&page)?;

    Ok(Html(html))
}

/// Handle asset requests.
///
/// # Endpoint
///
/// `GET /asset/{id}?key={share_key}[&thumbnail=true]`
///
/// The `preview` rendition is fetched unless `thumbnail=true`. The origin's
/// body is streamed through unmodified with its content type (or
/// `image/jpeg` when it sends none) and content length.
///
/// # Response
///
/// - `200 OK`: raw image bytes
/// - `404 Not Found`: any failure
pub async fn asset_handler<O: OriginClient>(
    State(state): State<AppState<O>>,
    asset_id: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Response, AssetError> {
    let Path(asset_id) = asset_id.map_err(AssetError::BadId)?;
    let params = AssetQueryParams::from_query(query.as_deref());

    let payload = state
        .origin()
        .fetch_asset(&asset_id, &params.key, params.size())
        .await?;

    let content_type = payload
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ASSET_CONTENT_TYPE));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(len) = payload.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    // Headers are already sent if the stream breaks, so this can only be logged.
    let body = payload.body.inspect_err(move |e| {
        warn!(asset_id = %asset_id, "Asset stream interrupted: {}", e);
    });

    Ok((StatusCode::OK, headers, Body::from_stream(body)).into_response())
}

/// Handle every path without a route, including `/`.
pub async fn not_found_handler() -> Response {
    let status = StatusCode::NOT_FOUND;
    let body = ErrorResponse::with_status("not_found", "Not found", status);
    (status, Json(body)).into_response()
}

// =============================================================================
// Tests
// =============================================================================
