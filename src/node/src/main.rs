//! Tangle node binary
//!
//! Wires configuration, logging, the persistent store, the DAG engine, the
//! peer-sync task, and the HTTP facade into a single server process.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tangle_api::AppState;
use tangle_dag::{Dag, Store};
use tokio::net::TcpListener;
use tracing::info;

mod config;
mod logging;
mod sync;

use config::Config;

/// Persistent DAG node with weighted MCMC tip selection
#[derive(Parser)]
#[command(name = "tangle-node", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    let _log_guard = logging::init(&cfg.logging).context("failed to initialize logger")?;

    info!(config = %cli.config.display(), "starting tangle node");

    let store = Store::open(&cfg.storage.path)
        .with_context(|| format!("failed to open store at {}", cfg.storage.path.display()))?;
    let dag = Arc::new(Dag::new(
        store,
        cfg.dag.max_parents,
        cfg.dag.default_weight,
    ));

    let _sync_task = sync::spawn(
        dag.clone(),
        cfg.dag.peers.clone(),
        cfg.dag.sync_interval as u64,
    );

    let app = tangle_api::build_router(AppState { dag });

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Resolve once the process is asked to stop, so in-flight requests can
/// drain before the store handle drops.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, stopping on Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    info!("shutdown requested");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
