//! Public listener acquisition.
//!
//! The tunnel provider owns the public identity: it terminates TLS for
//! `https://{hostname}` and forwards plain HTTP to a local address. All the
//! gateway asks of it is a listener to serve on.

use async_trait::async_trait;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::TunnelError;

/// Something that can hand the gateway a listener reachable from outside.
#[async_trait]
pub trait TunnelProvider: Send + Sync {
    /// Public name the tunnel is registered under.
    fn hostname(&self) -> &str;

    /// Obtain the listener to serve HTTP on.
    async fn listen(&self) -> Result<TcpListener, TunnelError>;

    /// URL at which shares are reachable from the internet.
    fn public_url(&self) -> String {
        format!("https://{}", self.hostname())
    }
}

/// Local end of a funnel-style tunnel.
///
/// The tunnel daemon (e.g. `tailscale funnel`) is configured out of band to
/// forward `hostname` to `bind_addr`; this binds that address.
#[derive(Debug, Clone)]
pub struct FunnelTunnel {
    hostname: String,
    bind_addr: String,
}

impl FunnelTunnel {
    pub fn new(hostname: impl Into<String>, bind_addr: impl Into<String>) -> Result<Self, TunnelError> {
        let hostname = hostname.into().trim().to_string();
        if hostname.is_empty() {
            return Err(TunnelError::MissingHostname);
        }
        Ok(Self {
            hostname,
            bind_addr: bind_addr.into(),
        })
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
}

#[async_trait]
impl TunnelProvider for FunnelTunnel {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    async fn listen(&self) -> Result<TcpListener, TunnelError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|source| TunnelError::Bind {
                addr: self.bind_addr.clone(),
                source,
            })?;

        info!(
            hostname = %self.hostname,
            local = %self.bind_addr,
            "Tunnel listener ready"
        );
        Ok(listener)
    }
}
