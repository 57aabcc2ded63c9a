//! JSON-RPC status server.
//!
//! A small read-only surface for health checks and operational insight.
//! It reports a snapshot maintained by the node's dispatch loop and never
//! touches the registry itself.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use jsonrpsee::server::{ServerBuilder, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Per-state peer counts published by the dispatch loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub peers: usize,
    pub hosting: usize,
    pub pending: usize,
    pub connecting: usize,
    pub completed: usize,
    /// Symmetrically cross-referenced pairs.
    pub matched_pairs: usize,
}

/// Shared signaling state for RPC queries.
#[derive(Debug)]
pub struct SharedSignalState {
    started_at: Instant,
    counts: StateCounts,
}

impl SharedSignalState {
    /// Create an empty state snapshot.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            counts: StateCounts::default(),
        }
    }

    /// Replace the published counts.
    pub fn set_counts(&mut self, counts: StateCounts) {
        self.counts = counts;
    }

    /// Current counts.
    pub fn counts(&self) -> StateCounts {
        self.counts
    }

    /// Build the status response.
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            uptime_secs: self.started_at.elapsed().as_secs(),
            peers: self.counts.peers,
            hosting: self.counts.hosting,
            pending: self.counts.pending,
            connecting: self.counts.connecting,
            completed: self.counts.completed,
            matched_pairs: self.counts.matched_pairs,
        }
    }
}

impl Default for SharedSignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Status report returned by the `status` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub uptime_secs: u64,
    pub peers: usize,
    pub hosting: usize,
    pub pending: usize,
    pub connecting: usize,
    pub completed: usize,
    pub matched_pairs: usize,
}

/// Handle to a running RPC server.
pub struct RpcServerHandle {
    handle: ServerHandle,
    /// The address the server actually bound to.
    pub local_addr: SocketAddr,
}

impl RpcServerHandle {
    /// Stop the server.
    pub fn stop(self) -> anyhow::Result<()> {
        self.handle.stop()?;
        Ok(())
    }
}

/// Start the JSON-RPC status server.
pub async fn start_rpc_server(
    addr: SocketAddr,
    state: Arc<RwLock<SharedSignalState>>,
) -> anyhow::Result<RpcServerHandle> {
    let server = ServerBuilder::default().build(addr).await?;
    let local_addr = server.local_addr()?;

    let mut module = RpcModule::new(state);

    // status - full snapshot of the signaling registry
    module
        .register_async_method("status", |_params, state, _| async move {
            let state = state.read().await;
            Ok::<_, ErrorObjectOwned>(state.status())
        })
        .unwrap();

    // getConnectionCount - number of registered peers
    module
        .register_async_method("getConnectionCount", |_params, state, _| async move {
            let state = state.read().await;
            Ok::<_, ErrorObjectOwned>(state.counts().peers as u64)
        })
        .unwrap();

    tracing::info!(addr = %local_addr, "status RPC server listening");
    let handle = server.start(module);

    Ok(RpcServerHandle { handle, local_addr })
}
