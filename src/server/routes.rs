//! Router configuration for the share gateway.
//!
//! # Route Structure
//!
//! ```text
//! /share/{key}                      - Gallery page for a share key
//! /asset/{id}?key=..&thumbnail=..   - Asset rendition passthrough
//! everything else (including /)     - 404
//! ```
//!
//! There is deliberately no index or health route: every entry point needs a
//! share key obtained out of band.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use share_gateway::origin::ImmichClient;
//! use share_gateway::render::GalleryTemplate;
//! use share_gateway::server::{create_router, RouterConfig};
//!
//! let origin = Arc::new(ImmichClient::new("http://immich:2283/")?);
//! let renderer = Arc::new(GalleryTemplate::from_file("templates/gallery.html")?);
//! let router = create_router(origin, renderer, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{asset_handler, not_found_handler, share_handler, AppState};
use crate::origin::OriginClient;
use crate::render::{PageRenderer, DEFAULT_PAGE_TITLE};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Title for galleries that are not albums
    pub default_title: String,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_PAGE_TITLE.to_string(),
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the gateway router.
///
/// The origin client and renderer are constructed by the caller and shared
/// read-only between all requests.
pub fn create_router<O>(
    origin: Arc<O>,
    renderer: Arc<dyn PageRenderer>,
    config: RouterConfig,
) -> Router
where
    O: OriginClient + 'static,
{
    let state = AppState::new(origin, renderer).with_default_title(&config.default_title);

    let router = Router::new()
        .route("/share/{key}", get(share_handler::<O>))
        .route("/asset/{id}", get(asset_handler::<O>))
        .fallback(not_found_handler)
        .with_state(state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
