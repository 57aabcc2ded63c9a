//! Signaling hub.
//!
//! Owns the registry and interprets inbound events. The transport layer
//! calls into the hub from a single task, one event at a time, so every
//! method here runs to completion before the next event is observed; the
//! registry is never seen in a torn state.

mod evictor;
mod matcher;
mod relay;

use tokio::sync::mpsc;

use crate::config::SignalConfig;
use crate::peer::{Peer, PeerCommand, PeerId, PeerState};
use crate::protocol::{Command, Frame};
use crate::registry::Registry;

/// The matchmaking state machine: registry, dispatcher, matcher, relay
/// and evictor behind one `&mut self` boundary.
#[derive(Debug)]
pub struct SignalHub {
    registry: Registry,
    config: SignalConfig,
}

impl SignalHub {
    /// Create a hub with the given configuration.
    pub fn new(config: SignalConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// Read access to the registry, for status reporting and tests.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a freshly connected transport and return its peer id.
    pub fn handle_connect(&mut self, command_tx: mpsc::UnboundedSender<PeerCommand>) -> PeerId {
        let id = self.registry.allocate_id();
        self.registry.add(Peer::new(id, command_tx));
        tracing::info!(peer = %id, "peer connected");
        id
    }

    /// Drop a peer whose transport reported disconnect or error. Idempotent;
    /// the peer may already be gone if the evictor got there first.
    pub fn handle_disconnect(&mut self, id: PeerId) {
        if self.registry.remove(id).is_some() {
            tracing::info!(peer = %id, "peer disconnected");
        }
    }

    /// Interpret one inbound message from a peer.
    ///
    /// Unrecognized or malformed messages are dropped without a state
    /// change or a reply, as are commands from states the transition table
    /// does not list.
    pub fn handle_message(&mut self, id: PeerId, line: &str) {
        let Some(command) = Command::parse(line) else {
            tracing::trace!(peer = %id, "ignoring unrecognized message");
            return;
        };

        // A message can race with removal; a gone peer's commands are void.
        let Some(peer) = self.registry.get_mut(id) else {
            return;
        };
        let state = peer.state;

        match command {
            Command::Echo(data) => {
                tracing::debug!(peer = %id, bytes = data.len(), "echo request");
                if let Err(e) = peer.send(Frame::Echo(data)) {
                    tracing::debug!(peer = %id, error = %e, "echo reply dropped");
                }
            }

            Command::Hosting(address) => {
                if state != PeerState::Idle {
                    return;
                }
                tracing::info!(peer = %id, address = %address, "peer wants to host");
                peer.state = PeerState::Hosting;
                peer.address = address;
                self.try_match(id);
            }

            Command::Connect(address) => {
                if state != PeerState::Idle {
                    return;
                }
                tracing::info!(peer = %id, address = %address, "peer wants to join");
                peer.state = PeerState::Pending;
                peer.address = address;
                self.try_match(id);
            }

            Command::PostSdp(payload) => {
                if state.can_post_payload() {
                    self.relay(id, payload);
                }
            }

            Command::Success => match state {
                PeerState::Connecting => {
                    tracing::info!(peer = %id, "joiner reports successful connection");
                    peer.state = PeerState::Completed;
                }
                PeerState::Hosting => {
                    // The host served its joiner and becomes available for
                    // the next one waiting at the same address.
                    tracing::info!(peer = %id, "host reports successful connection");
                    peer.clear_match();
                    self.try_match(id);
                }
                _ => {}
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use tokio::sync::mpsc;

    use crate::peer::{PeerCommand, PeerId};

    use super::SignalHub;

    /// Connect a test peer and keep its command receiver for inspection.
    pub fn connect(hub: &mut SignalHub) -> (PeerId, mpsc::UnboundedReceiver<PeerCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (hub.handle_connect(tx), rx)
    }

    /// Drain everything currently queued for a test peer.
    pub fn drain(rx: &mut mpsc::UnboundedReceiver<PeerCommand>) -> Vec<PeerCommand> {
        let mut out = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            out.push(cmd);
        }
        out
    }
}
