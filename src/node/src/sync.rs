//! Periodic peer synchronization
//!
//! Pulls `GET /nodes` from each configured peer and feeds the result
//! through the engine's merge path, which skips pre-existing, cyclic, and
//! over-parented vertices. Per-peer failures are logged and never abort the
//! cycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tangle_dag::{Dag, NewVertex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info};

/// Timeout applied to each peer request.
const PEER_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn the background sync task; returns `None` when no peers are
/// configured.
pub fn spawn(dag: Arc<Dag>, peers: Vec<String>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if peers.is_empty() {
        return None;
    }
    Some(tokio::spawn(run(dag, peers, interval_secs)))
}

async fn run(dag: Arc<Dag>, peers: Vec<String>, interval_secs: u64) {
    let client = match reqwest::Client::builder().timeout(PEER_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build sync HTTP client");
            return;
        }
    };

    let mut ticker = interval(Duration::from_secs(interval_secs));
    // The first tick completes immediately; consume it so the first sync
    // waits one full period.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        for peer in &peers {
            if let Err(e) = sync_with_peer(&client, &dag, peer).await {
                error!(peer = %peer, error = %e, "failed to sync with peer");
            }
        }
    }
}

/// Fetch a peer's vertex list and merge it through the engine.
///
/// The request carries its own timeout and completes before the engine's
/// exclusive lock is taken, so the critical section never spans network I/O.
async fn sync_with_peer(client: &reqwest::Client, dag: &Dag, peer: &str) -> Result<()> {
    info!(peer = %peer, "syncing with peer");

    let response = client.get(format!("{}/nodes", peer)).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("peer {} returned status {}", peer, response.status());
    }
    let nodes: Vec<NewVertex> = response.json().await?;

    let merged = dag.merge_vertices(nodes);
    if merged.is_empty() {
        info!(peer = %peer, "no new nodes merged from peer");
    } else {
        info!(peer = %peer, count = merged.len(), merged = ?merged, "merged nodes from peer");
    }
    Ok(())
}
