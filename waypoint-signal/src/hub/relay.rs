//! Payload relay between a matched pair.

use crate::peer::{PeerId, PeerState};
use crate::protocol::Frame;

use super::SignalHub;

impl SignalHub {
    /// Forward a negotiation payload from `source` to its counterpart.
    ///
    /// The counterpart id is a weak reference: it is re-resolved through
    /// the registry on every relay, and forwarding only happens when the
    /// pair is still symmetric and the destination is in the expected
    /// state for the direction. Anything else drops the payload silently;
    /// so does a closed destination transport.
    pub(crate) fn relay(&mut self, source: PeerId, payload: String) {
        let Some(src) = self.registry.get(source) else {
            return;
        };

        // Host forwards to its connecting joiner; a connecting joiner
        // forwards to its host. Other states never relay.
        let expected_dest_state = match src.state {
            PeerState::Hosting => PeerState::Connecting,
            PeerState::Connecting => PeerState::Hosting,
            _ => return,
        };

        let dest_id = src.other;
        let Some(dest) = self.registry.get(dest_id) else {
            // Counterpart disconnected; the reference dangles. Tolerated.
            return;
        };
        if dest.other != source || dest.state != expected_dest_state {
            // Stale or asymmetric pairing; never forward across it.
            return;
        }

        match dest.send(Frame::PostSdp(payload)) {
            Ok(()) => {
                tracing::debug!(
                    from = %source,
                    to = %dest_id,
                    "relaying negotiation payload"
                );
            }
            Err(e) => {
                tracing::debug!(from = %source, to = %dest_id, error = %e, "payload dropped");
            }
        }
    }
}
