// ABOUTME: Entry point for the gatekeeper binary.
// ABOUTME: Parses CLI arguments, loads configuration, initializes tracing, and starts the HTTP server.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gatekeeper_core::AccessRegistry;
use gatekeeper_server::auth::AdminSecret;
use gatekeeper_server::{AppState, GatekeeperConfig, create_router};

/// IP access gate with live administrator approval.
#[derive(Debug, Parser)]
#[command(name = "gatekeeper", version, about)]
struct Cli {
    /// Listening port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Listening interface (overrides GATEKEEPER_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Directory served for unmatched paths (overrides GATEKEEPER_PUBLIC_DIR)
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gatekeeper=debug,gatekeeper_server=debug,gatekeeper_core=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let mut config = GatekeeperConfig::from_env().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.bind.set_port(port);
    }
    if let Some(host) = cli.host {
        config.bind.set_ip(host);
    }
    if let Some(dir) = cli.public_dir {
        config.public_dir = dir;
    }

    tracing::info!("gatekeeper starting up");

    let registry = gatekeeper_core::spawn(AccessRegistry::new());
    let state = Arc::new(
        AppState::new(registry, AdminSecret::new(config.admin_secret.clone()))
            .trust_forwarded(config.trust_forwarded),
    );
    let public_dir = config.public_dir.is_dir().then(|| config.public_dir.clone());
    if public_dir.is_none() {
        tracing::debug!(dir = %config.public_dir.display(), "public directory not found, static fallback disabled");
    }
    let app = create_router(state, public_dir);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local = listener.local_addr()?;

    tracing::info!("server running on {}", local);
    tracing::info!("client page: http://{}/", display_addr(local));
    tracing::info!("admin panel: http://{}/admin", display_addr(local));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("gatekeeper stopped");
    Ok(())
}

/// Unspecified bind addresses are shown as localhost in the startup banner.
fn display_addr(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
