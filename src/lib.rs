//! # Share Gateway
//!
//! A small reverse gateway that republishes an Immich server's shared links
//! and shared albums to the public internet over a tunnel.
//!
//! Clients only ever see gateway-local URLs. Share keys are passed through to
//! the origin, which stays the sole authority on what a key may see; the
//! origin's address and any failure detail never reach the public side.
//!
//! ## Architecture
//!
//! - [`origin`] - Typed origin API records and the `reqwest` client
//! - [`share`] - Share resolution and asset URL rewriting
//! - [`render`] - Gallery template loading and rendering
//! - [`server`] - Axum router and handlers
//! - [`tunnel`] - Public listener acquisition
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use share_gateway::{create_router, GalleryTemplate, ImmichClient, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let origin = Arc::new(ImmichClient::new("http://immich:2283/")?);
//!     let renderer = Arc::new(GalleryTemplate::builtin()?);
//!     let router = create_router(origin, renderer, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod origin;
pub mod render;
pub mod server;
pub mod share;
pub mod tunnel;

// Re-export commonly used types
pub use error::{OriginError, RenderError, ShareError, TunnelError};
pub use origin::{ImmichClient, OriginClient};
pub use render::{GalleryTemplate, PageRenderer};
pub use server::{create_router, RouterConfig};
pub use share::ShareResolver;
pub use tunnel::{FunnelTunnel, TunnelProvider};
