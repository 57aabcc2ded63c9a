//! Core configuration.

/// Default registry size below which eviction never runs.
pub const DEFAULT_EVICTION_THRESHOLD: usize = 32;

/// Default number of newer connections after which a non-hosting peer is
/// considered stale.
pub const DEFAULT_STALENESS_WINDOW: u64 = 64;

/// Configuration for the signaling core.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Registry size at which the evictor starts running. Below this the
    /// registry is never scanned for stale entries.
    pub eviction_threshold: usize,

    /// A non-hosting peer is evicted once this many newer connections have
    /// been accepted after it. Hosts are exempt regardless of age.
    pub staleness_window: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            eviction_threshold: DEFAULT_EVICTION_THRESHOLD,
            staleness_window: DEFAULT_STALENESS_WINDOW,
        }
    }
}

impl SignalConfig {
    /// Create a configuration with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registry size at which eviction starts.
    pub fn with_eviction_threshold(mut self, threshold: usize) -> Self {
        self.eviction_threshold = threshold;
        self
    }

    /// Set the staleness window in connection ids.
    pub fn with_staleness_window(mut self, window: u64) -> Self {
        self.staleness_window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SignalConfig::default();
        assert_eq!(config.eviction_threshold, DEFAULT_EVICTION_THRESHOLD);
        assert_eq!(config.staleness_window, DEFAULT_STALENESS_WINDOW);
    }

    #[test]
    fn test_config_builder() {
        let config = SignalConfig::new()
            .with_eviction_threshold(4)
            .with_staleness_window(8);

        assert_eq!(config.eviction_threshold, 4);
        assert_eq!(config.staleness_window, 8);
    }
}
