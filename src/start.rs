//! Startup helpers for the engine host.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use crate::engine::EngineConfig;
use crate::server::{self, AppState};

/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "INVIDIOUS_ENGINE_PORT";

/// Run the host until Ctrl+C.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Invidious engine v{}", env!("CARGO_PKG_VERSION"));

    let state = match initialize() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to initialize: {e:#}");
            return ExitCode::from(1);
        }
    };

    let port = get_port();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(state, port, shutdown_signal())) {
        tracing::error!("Server error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Load configuration from the environment and build the application state.
///
/// # Errors
/// Returns an error if no base URL is configured or the state cannot be created.
pub fn initialize() -> anyhow::Result<Arc<AppState>> {
    let config = EngineConfig::from_env().context("loading engine configuration")?;
    AppState::new(config).context("creating application state")
}

/// Get configured server port.
#[must_use]
pub fn get_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(server::DEFAULT_PORT)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
