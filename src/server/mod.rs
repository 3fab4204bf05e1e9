//! HTTP server layer for the share gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │           GET /share/{key}        GET /asset/{id}               │
//! │                                                                 │
//! │  ┌─────────────────────────┐  ┌─────────────────────────────┐   │
//! │  │        handlers         │  │           routes            │   │
//! │  │ (resolve, render, pipe) │  │  (router config, fallback)  │   │
//! │  └─────────────────────────┘  └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse};
pub use routes::{create_router, RouterConfig};
