//! Node orchestrator.
//!
//! Accepts WebSocket connections and drives the signaling hub from one
//! `select!` loop: every connect, message and disconnect event is
//! processed to completion before the next, which is the entire
//! concurrency story of the registry. Per-connection I/O lives in its
//! own task (see [`crate::connection`]).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, RwLock};

use waypoint_signal::{PeerState, SignalHub};

use crate::config::NodeConfig;
use crate::connection::{spawn_connection, SessionEvent};
use crate::rpc::{self, SharedSignalState, StateCounts};
use crate::shutdown::wait_for_shutdown_signal;

/// Capacity of the session event channel feeding the dispatch loop.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The rendezvous server node.
pub struct Node {
    /// Node configuration.
    config: NodeConfig,

    /// Shared signaling state for RPC queries.
    status: Arc<RwLock<SharedSignalState>>,

    /// Shutdown signal sender (for cloning).
    shutdown_tx: mpsc::Sender<()>,

    /// Shutdown signal receiver.
    shutdown_rx: Option<mpsc::Receiver<()>>,

    /// Channel to report the bound signaling address when the node starts.
    bound_addr_tx: Option<oneshot::Sender<SocketAddr>>,

    /// Channel to report the bound RPC address when the node starts.
    rpc_addr_tx: Option<oneshot::Sender<SocketAddr>>,
}

impl Node {
    /// Create a new node with the given configuration.
    pub fn new(config: NodeConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            config,
            status: Arc::new(RwLock::new(SharedSignalState::new())),
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
            bound_addr_tx: None,
            rpc_addr_tx: None,
        }
    }

    /// Get the shutdown sender for external shutdown requests.
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Get a oneshot receiver for the bound signaling address.
    /// Useful for tests that bind to port 0.
    pub fn bound_addr_receiver(&mut self) -> oneshot::Receiver<SocketAddr> {
        let (tx, rx) = oneshot::channel();
        self.bound_addr_tx = Some(tx);
        rx
    }

    /// Get a oneshot receiver for the bound RPC address.
    pub fn rpc_addr_receiver(&mut self) -> oneshot::Receiver<SocketAddr> {
        let (tx, rx) = oneshot::channel();
        self.rpc_addr_tx = Some(tx);
        rx
    }

    /// Run the node until a shutdown signal arrives.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.listen).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "signaling server listening");

        if let Some(tx) = self.bound_addr_tx.take() {
            let _ = tx.send(local_addr);
        }

        let rpc_handle = rpc::start_rpc_server(self.config.rpc_listen, self.status.clone()).await?;
        if let Some(tx) = self.rpc_addr_tx.take() {
            let _ = tx.send(rpc_handle.local_addr);
        }

        let (event_tx, mut event_rx) = mpsc::channel::<SessionEvent>(EVENT_CHANNEL_CAPACITY);
        let mut hub = SignalHub::new(self.config.signal.clone());

        let mut shutdown_rx = self.shutdown_rx.take().unwrap();
        let shutdown_signal = wait_for_shutdown_signal();
        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }

                _ = &mut shutdown_signal => {
                    break;
                }

                // Accept inbound connections; the handshake runs in the
                // connection task so a slow client cannot stall dispatch.
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if let Err(e) = stream.set_nodelay(true) {
                                tracing::warn!(addr = %addr, error = %e, "Failed to set TCP_NODELAY");
                            }
                            tracing::debug!(addr = %addr, "inbound connection");
                            spawn_connection(stream, addr, event_tx.clone());
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "accept error");
                        }
                    }
                }

                // Dispatch session events, strictly one at a time.
                Some(event) = event_rx.recv() => {
                    Self::dispatch(&mut hub, event);
                    self.publish_status(&hub).await;
                }
            }
        }

        rpc_handle.stop()?;
        tracing::info!("node shutdown complete");
        Ok(())
    }

    /// Feed one session event into the hub.
    fn dispatch(hub: &mut SignalHub, event: SessionEvent) {
        match event {
            SessionEvent::Connected {
                addr,
                command_tx,
                id_tx,
            } => {
                let id = hub.handle_connect(command_tx);
                tracing::debug!(peer = %id, addr = %addr, "transport registered");
                // The task gave up if the handshake died meanwhile.
                let _ = id_tx.send(id);
            }
            SessionEvent::Message { id, text } => {
                hub.handle_message(id, &text);
            }
            SessionEvent::Disconnected { id } => {
                hub.handle_disconnect(id);
            }
        }
    }

    /// Publish a registry snapshot for the RPC surface.
    async fn publish_status(&self, hub: &SignalHub) {
        let mut counts = StateCounts::default();
        let registry = hub.registry();

        for peer in registry.iter() {
            counts.peers += 1;
            match peer.state {
                PeerState::Idle => {}
                PeerState::Hosting => counts.hosting += 1,
                PeerState::Pending => counts.pending += 1,
                PeerState::Connecting => counts.connecting += 1,
                PeerState::Completed => counts.completed += 1,
            }

            // Count each symmetric pairing once, from its lower id.
            if peer.is_matched() && peer.id < peer.other {
                if let Some(other) = registry.get(peer.other) {
                    if other.other == peer.id {
                        counts.matched_pairs += 1;
                    }
                }
            }
        }

        self.status.write().await.set_counts(counts);
    }
}
