//! Node configuration.

use std::net::SocketAddr;

use waypoint_signal::SignalConfig;

use crate::cli::Cli;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// WebSocket listen address for signaling peers.
    pub listen: SocketAddr,

    /// JSON-RPC status listen address.
    pub rpc_listen: SocketAddr,

    /// Log level.
    pub log_level: String,

    /// Matchmaking core configuration.
    pub signal: SignalConfig,
}

impl NodeConfig {
    /// Create a node configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            listen: cli.listen,
            rpc_listen: cli.rpc_listen,
            log_level: cli.log_level.clone(),
            signal: SignalConfig::new()
                .with_eviction_threshold(cli.eviction_threshold)
                .with_staleness_window(cli.staleness_window),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:10000".parse().expect("static address"),
            rpc_listen: "127.0.0.1:10001".parse().expect("static address"),
            log_level: "info".to_string(),
            signal: SignalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.listen.port(), 10000);
        assert_eq!(config.rpc_listen.port(), 10001);
    }

    #[test]
    fn test_from_cli_carries_thresholds() {
        let cli = Cli::parse_from([
            "waypoint-node",
            "--eviction-threshold",
            "4",
            "--staleness-window",
            "8",
        ]);
        let config = NodeConfig::from_cli(&cli);
        assert_eq!(config.signal.eviction_threshold, 4);
        assert_eq!(config.signal.staleness_window, 8);
    }
}
