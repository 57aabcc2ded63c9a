//! Peers and their matchmaking state.

pub mod state;

use std::fmt;

use tokio::sync::mpsc;

use crate::error::{SignalError, SignalResult};
use crate::protocol::Frame;

pub use state::PeerState;

/// Unique identifier for a peer connection.
///
/// Assigned monotonically at connect time and never reused while the
/// process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl PeerId {
    /// Create a peer ID from a counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Command sent to a peer's transport task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCommand {
    /// Send a text frame to the peer.
    Send(String),
    /// Close the connection.
    Disconnect,
}

/// One registered connection and its matchmaking state.
#[derive(Debug)]
pub struct Peer {
    /// Unique id, stable for the connection's lifetime.
    pub id: PeerId,
    /// Current matchmaking state.
    pub state: PeerState,
    /// Opaque identifier the peer declared; empty until it hosts or joins.
    pub address: String,
    /// Id of the matched counterpart. Equals `id` while unmatched; may
    /// dangle once the counterpart disconnects, so consumers re-resolve it
    /// through the registry and never trust it blindly.
    pub other: PeerId,
    /// Command channel into the peer's transport task.
    command_tx: mpsc::UnboundedSender<PeerCommand>,
}

impl Peer {
    /// Create a freshly connected peer in the idle state.
    pub fn new(id: PeerId, command_tx: mpsc::UnboundedSender<PeerCommand>) -> Self {
        Self {
            id,
            state: PeerState::Idle,
            address: String::new(),
            other: id,
            command_tx,
        }
    }

    /// Whether the transport task behind this peer is still alive.
    pub fn is_open(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Send a frame to the peer. Best effort: a closed transport reports
    /// an error for logging but nothing more.
    pub fn send(&self, frame: Frame) -> SignalResult<()> {
        self.command_tx
            .send(PeerCommand::Send(frame.encode()))
            .map_err(|_| SignalError::ConnectionClosed(self.id))
    }

    /// Ask the transport task to close the connection.
    pub fn close(&self) {
        let _ = self.command_tx.send(PeerCommand::Disconnect);
    }

    /// Whether this peer is currently paired with a counterpart.
    pub fn is_matched(&self) -> bool {
        self.other != self.id
    }

    /// Return to the unmatched sentinel.
    pub fn clear_match(&mut self) {
        self.other = self.id;
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, addr={:?})", self.id, self.state, self.address)
    }
}
