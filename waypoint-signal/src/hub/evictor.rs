//! Stale peer eviction.

use super::SignalHub;

impl SignalHub {
    /// Reclaim stale registry entries.
    ///
    /// Runs after every match attempt and short-circuits below the
    /// configured threshold, so small deployments never pay for the scan.
    /// Two classes of peer are dropped:
    ///
    /// - peers whose transport is no longer open (abandoned connections
    ///   that never delivered a disconnect event)
    /// - non-hosting peers older than the staleness window, measured in
    ///   connection ids rather than wall-clock time: once enough newer
    ///   connections have arrived, a stuck joiner is given up on
    ///
    /// Hosts are exempt from the age rule; a long-lived host is legitimate.
    pub(crate) fn evict_stale(&mut self) {
        if self.registry.len() < self.config.eviction_threshold {
            return;
        }

        let next_id = self.registry.next_id();
        let window = self.config.staleness_window;
        let before = self.registry.len();

        self.registry.retain(|peer| {
            if !peer.is_open() {
                tracing::debug!(peer = %peer.id, "evicting closed connection");
                return false;
            }

            if !peer.state.is_hosting() && peer.id.0 + window < next_id {
                tracing::debug!(peer = %peer.id, state = %peer.state, "evicting stale peer");
                peer.close();
                return false;
            }

            true
        });

        let remaining = self.registry.len();
        tracing::debug!(before, remaining, "registry cleanup");
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SignalConfig;
    use crate::hub::test_util::connect;
    use crate::hub::SignalHub;
    use crate::peer::PeerCommand;

    /// A hub with a tiny threshold/window so tests stay small.
    fn small_hub() -> SignalHub {
        SignalHub::new(
            SignalConfig::new()
                .with_eviction_threshold(4)
                .with_staleness_window(8),
        )
    }

    #[test]
    fn test_below_threshold_nothing_is_evicted() {
        let mut hub = small_hub();
        let (a, rx) = connect(&mut hub);
        let (_b, _rx_b) = connect(&mut hub);

        // Even a closed connection survives while the registry is small.
        drop(rx);
        hub.evict_stale();

        assert!(hub.registry().get(a).is_some());
        assert_eq!(hub.registry().len(), 2);
    }

    #[test]
    fn test_closed_connections_are_dropped_at_threshold() {
        let mut hub = small_hub();
        let (dead, rx) = connect(&mut hub);
        let mut keep = Vec::new();
        for _ in 0..4 {
            keep.push(connect(&mut hub));
        }
        drop(rx);

        hub.evict_stale();

        assert!(hub.registry().get(dead).is_none());
        assert_eq!(hub.registry().len(), 4);
    }

    #[test]
    fn test_stale_non_host_is_closed_and_dropped() {
        let mut hub = small_hub();
        let (old, mut old_rx) = connect(&mut hub);
        hub.handle_message(old, "CONNECT:room1");

        // Accept enough newer connections to push `old` out of the window.
        let mut keep = Vec::new();
        for _ in 0..9 {
            keep.push(connect(&mut hub));
        }

        hub.evict_stale();

        assert!(hub.registry().get(old).is_none());
        // The evicted peer's transport was told to close.
        assert_eq!(old_rx.try_recv().unwrap(), PeerCommand::Disconnect);
    }

    #[test]
    fn test_hosts_are_exempt_from_staleness() {
        let mut hub = small_hub();
        let (host, _host_rx) = connect(&mut hub);
        hub.handle_message(host, "HOSTING:room1");

        let mut keep = Vec::new();
        for _ in 0..20 {
            keep.push(connect(&mut hub));
        }

        hub.evict_stale();

        assert!(hub.registry().get(host).is_some());
    }

    #[test]
    fn test_fresh_peers_within_window_are_retained() {
        let mut hub = small_hub();
        let mut keep = Vec::new();
        for _ in 0..6 {
            keep.push(connect(&mut hub));
        }

        hub.evict_stale();

        // next_id is 6; nobody satisfies id + 8 < 6.
        assert_eq!(hub.registry().len(), 6);
    }

    #[test]
    fn test_match_attempt_triggers_eviction() {
        let mut hub = small_hub();
        let (old, _old_rx) = connect(&mut hub);
        hub.handle_message(old, "CONNECT:room-a");

        let mut keep = Vec::new();
        for _ in 0..9 {
            keep.push(connect(&mut hub));
        }

        // A declaration from a fresh peer runs the matcher, which runs the
        // evictor even though no match is found.
        let (trigger, trigger_rx) = keep.pop().unwrap();
        hub.handle_message(trigger, "CONNECT:room-b");
        let _ = trigger_rx;

        assert!(hub.registry().get(old).is_none());
    }

    #[test]
    fn test_idle_window_interplay() {
        // 40 pending peers, ids 0..39, next id 40: with the default window
        // of 64 nobody is stale (39 + 64 >= 40), so eviction above the
        // threshold still removes nothing.
        let mut hub = SignalHub::new(SignalConfig::default());
        let mut keep = Vec::new();
        for _ in 0..40 {
            let (id, rx) = connect(&mut hub);
            hub.handle_message(id, "CONNECT:crowded");
            keep.push(rx);
        }

        hub.evict_stale();

        assert_eq!(hub.registry().len(), 40);
    }

    #[test]
    fn test_eviction_counts_closed_hosts_too() {
        // The age rule exempts hosts, the open-transport rule does not.
        let mut hub = small_hub();
        let (host, host_rx) = connect(&mut hub);
        hub.handle_message(host, "HOSTING:room1");
        let mut keep = Vec::new();
        for _ in 0..4 {
            keep.push(connect(&mut hub));
        }
        drop(host_rx);

        hub.evict_stale();

        assert!(hub.registry().get(host).is_none());
    }
}
