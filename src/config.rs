//! Configuration management for the share gateway.
//!
//! Every option can be given on the command line or through the environment:
//!
//! - `IMMICH_BASE_URL` - Base URL of the origin photo service (required)
//! - `TUNNEL_HOSTNAME` - Public name the tunnel is registered under (required)
//! - `GATEWAY_HOST` - Local bind address the tunnel forwards to (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Local port the tunnel forwards to (default: 8080)
//! - `GATEWAY_TEMPLATE` - Gallery template path (default: templates/gallery.html)
//! - `GATEWAY_DEFAULT_TITLE` - Title for non-album galleries (default: Immich Gallery)
//!
//! # Example
//!
//! ```text
//! IMMICH_BASE_URL=http://immich:2283/ TUNNEL_HOSTNAME=immich-share \
//!     share-gateway serve --port 8080
//! ```

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::render::DEFAULT_PAGE_TITLE;

// =============================================================================
// Default Values
// =============================================================================

/// Default local bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default local bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default gallery template location.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/gallery.html";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Share Gateway - publish Immich shared links through a tunnel.
///
/// Serves shared albums and links to the internet while keeping the origin
/// service's address and credentials private.
#[derive(Parser, Debug, Clone)]
#[command(name = "share-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the gateway
    Serve(ServeConfig),

    /// Validate configuration, template, and origin reachability, then exit
    Check(CheckConfig),
}

/// Settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the origin photo service.
    #[arg(long, env = "IMMICH_BASE_URL")]
    pub origin_url: String,

    /// Public hostname the tunnel provider exposes this gateway under.
    #[arg(long, env = "TUNNEL_HOSTNAME")]
    pub tunnel_hostname: String,

    /// Path to the gallery page template.
    #[arg(long, default_value = DEFAULT_TEMPLATE_PATH, env = "GATEWAY_TEMPLATE")]
    pub template: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl GatewayConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.origin_url.trim().is_empty() {
            return Err("Origin URL is required. Set --origin-url or IMMICH_BASE_URL".to_string());
        }

        let url = Url::parse(self.origin_url.trim())
            .map_err(|e| format!("Origin URL '{}' is invalid: {}", self.origin_url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Origin URL must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.tunnel_hostname.trim().is_empty() {
            return Err(
                "Tunnel hostname is required. Set --tunnel-hostname or TUNNEL_HOSTNAME".to_string(),
            );
        }

        if self.template.trim().is_empty() {
            return Err("Template path must not be empty".to_string());
        }

        Ok(())
    }
}

/// Arguments of `share-gateway serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[command(flatten)]
    pub gateway: GatewayConfig,

    /// Local address the tunnel forwards to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GATEWAY_HOST")]
    pub host: String,

    /// Local port the tunnel forwards to.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GATEWAY_PORT")]
    pub port: u16,

    /// Page title for shares that are not albums.
    #[arg(long, default_value = DEFAULT_PAGE_TITLE, env = "GATEWAY_DEFAULT_TITLE")]
    pub default_title: String,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.gateway.validate()?;

        if self.host.trim().is_empty() {
            return Err("Bind host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the local bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Arguments of `share-gateway check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub gateway: GatewayConfig,
}

// =============================================================================
// Tests
// =============================================================================
