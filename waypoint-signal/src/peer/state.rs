//! Peer state machine.

use std::fmt;

/// Matchmaking state of a peer.
///
/// Transitions are driven by inbound commands only; see the dispatcher in
/// [`crate::hub`]. `Completed` is terminal for matching but not for the
/// connection: only disconnect or eviction removes a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerState {
    /// Connected, nothing declared yet.
    #[default]
    Idle,
    /// Declared as a host, available or mid-negotiation.
    Hosting,
    /// Declared as a joiner, waiting for a host at the same address.
    Pending,
    /// Joiner paired with a host, negotiating.
    Connecting,
    /// Joiner reported a successful direct connection.
    Completed,
}

impl PeerState {
    /// Whether this peer is a host. Hosts are exempt from staleness
    /// eviction and become re-available after reporting success.
    pub fn is_hosting(&self) -> bool {
        matches!(self, PeerState::Hosting)
    }

    /// Whether the peer may post negotiation payloads for relaying.
    pub fn can_post_payload(&self) -> bool {
        matches!(self, PeerState::Hosting | PeerState::Connecting)
    }

    /// Whether the peer is waiting to be matched.
    pub fn is_waiting(&self) -> bool {
        matches!(self, PeerState::Hosting | PeerState::Pending)
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerState::Idle => write!(f, "idle"),
            PeerState::Hosting => write!(f, "hosting"),
            PeerState::Pending => write!(f, "pending"),
            PeerState::Connecting => write!(f, "connecting"),
            PeerState::Completed => write!(f, "completed"),
        }
    }
}
