//! Escritoir edge server.
//!
//! Serves the dashboard front end behind Basic Auth, answers `/health`
//! unauthenticated and relays `/api/escritoir/dashboard` to the Escritoir API.
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!     Client Request       │  request id → trace                          │
//!     ─────────────────────┼─▶ /health ─────────────────▶ 200             │
//!                          │   /api/escritoir/dashboard ─▶ upstream proxy ─┼──▶ Escritoir API
//!                          │   /* ─▶ Basic Auth gate ─▶ static bundle      │
//!                          └──────────────────────────────────────────────┘
//! ```

use escritoir_edge::config::{self, ConfigError};
use escritoir_edge::lifecycle::{wait_for_signal, Shutdown};
use escritoir_edge::observability::init_logging;
use escritoir_edge::HttpServer;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read before parsing so .env values act as environment fallbacks.
    let dotenv = dotenvy::dotenv();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(ConfigError::Args(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    init_logging(config.observability.log_format);

    tracing::info!("escritoir-edge v{} starting", env!("CARGO_PKG_VERSION"));

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    for warning in config::lint_config(&config) {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        static_dir = %config.assets.dir.display(),
        index = %config.assets.index,
        upstream_configured = config.upstream.target().is_ok(),
        upstream_timeout_secs = config.upstream.timeout_secs,
        basic_auth = config.basic_auth.is_some(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
