//! Share Gateway - publish Immich shared links through a tunnel.
//!
//! This binary loads configuration, builds the gateway, and serves it on the
//! tunnel's listener.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use share_gateway::{
    config::{CheckConfig, Cli, Command, ServeConfig},
    create_router,
    render::GalleryTemplate,
    server::RouterConfig,
    tunnel::{FunnelTunnel, TunnelProvider},
    ImmichClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.gateway.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let gateway = &config.gateway;

    info!("Configuration:");
    info!("  Tunnel hostname: {}", gateway.tunnel_hostname);
    info!("  Local address: {}", config.bind_address());
    info!("  Template: {}", gateway.template);
    info!("  Default title: {}", config.default_title);

    // Without the template no request can be answered correctly
    let renderer = match GalleryTemplate::from_file(&gateway.template) {
        Ok(template) => Arc::new(template),
        Err(e) => {
            error!("Failed to load template: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let origin = match ImmichClient::new(&gateway.origin_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create origin client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tunnel = match FunnelTunnel::new(&gateway.tunnel_hostname, config.bind_address()) {
        Ok(tunnel) => tunnel,
        Err(e) => {
            error!("Tunnel error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let listener = match tunnel.listen().await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to obtain tunnel listener: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router_config = RouterConfig::default()
        .with_default_title(&config.default_title)
        .with_tracing(!config.no_tracing);
    let router = create_router(origin, renderer, router_config);

    info!("Serving shares at {}/share/<key>", tunnel.public_url());

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Shut down");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "share_gateway=debug,tower_http=debug"
    } else {
        "share_gateway=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    let gateway = &config.gateway;
    if gateway.verbose {
        init_logging(true);
    }

    println!("Share Gateway Configuration Check");
    println!("═════════════════════════════════");
    println!();

    if let Err(e) = gateway.validate() {
        println!("✗ Configuration: {}", e);
        return ExitCode::FAILURE;
    }
    println!("✓ Tunnel hostname: {}", gateway.tunnel_hostname);

    match GalleryTemplate::from_file(&gateway.template) {
        Ok(_) => println!("✓ Template: {}", gateway.template),
        Err(e) => {
            println!("✗ Template: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let client = match ImmichClient::new(&gateway.origin_url) {
        Ok(client) => client,
        Err(e) => {
            println!("✗ Origin: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("✓ Origin: {}", client.base_url());
    println!();

    print!("Testing origin connection... ");
    match client.ping().await {
        Ok(status) => println!("✓ reachable (HTTP {})", status),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check:");
            println!("  - The origin service is running");
            println!("  - IMMICH_BASE_URL points at it from this host");
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("═════════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
