//! Pairing of hosts and joiners.

use crate::peer::{PeerId, PeerState};
use crate::protocol::Frame;

use super::SignalHub;

impl SignalHub {
    /// Try to pair `source` with the earliest compatible counterpart.
    ///
    /// Invoked after every transition into hosting, pending, or a host's
    /// success reset. Scans the registry in insertion order and takes the
    /// first open peer in the complementary state declaring the same
    /// address; there is no ranking beyond arrival order. After any scan,
    /// matched or not, the evictor runs.
    pub(crate) fn try_match(&mut self, source: PeerId) {
        let Some(src) = self.registry.get(source) else {
            return;
        };

        let target_state = match src.state {
            PeerState::Hosting if src.is_matched() => {
                // Host is mid-negotiation with a joiner; it becomes
                // available again when it reports success.
                tracing::debug!(peer = %source, "host busy, not matching");
                return;
            }
            PeerState::Hosting => PeerState::Pending,
            PeerState::Pending => PeerState::Hosting,
            _ => return,
        };
        let source_is_host = src.state.is_hosting();
        let address = src.address.clone();

        let found = self
            .registry
            .iter()
            .filter(|peer| peer.is_open())
            .find(|peer| peer.state == target_state && peer.address == address)
            .map(|peer| peer.id);

        if let Some(counterpart) = found {
            let (host, joiner) = if source_is_host {
                (source, counterpart)
            } else {
                (counterpart, source)
            };
            self.complete_match(host, joiner, &address);
        }

        self.evict_stale();
    }

    /// Bind a host/joiner pair: the joiner starts connecting, the host is
    /// cued to post its offer, and the cross-references become symmetric.
    fn complete_match(&mut self, host: PeerId, joiner: PeerId, address: &str) {
        tracing::info!(
            host = %host,
            joiner = %joiner,
            address = %address,
            "match found"
        );

        if let Some(join_peer) = self.registry.get_mut(joiner) {
            join_peer.state = PeerState::Connecting;
            join_peer.other = host;
        }
        if let Some(host_peer) = self.registry.get_mut(host) {
            host_peer.other = joiner;
            if let Err(e) = host_peer.send(Frame::GetSdp) {
                // Best effort; the dead transport will surface as a
                // disconnect and tear the pairing down.
                tracing::debug!(host = %host, error = %e, "offer cue dropped");
            }
        }
    }
}
