//! Command-line argument parsing.

use std::net::SocketAddr;

use clap::Parser;

use waypoint_signal::config::{DEFAULT_EVICTION_THRESHOLD, DEFAULT_STALENESS_WINDOW};

/// Waypoint rendezvous server.
#[derive(Parser, Debug, Clone)]
#[command(name = "waypoint-node")]
#[command(about = "WebSocket rendezvous server for NAT-bound peers")]
#[command(version)]
pub struct Cli {
    /// WebSocket listen address for signaling peers.
    #[arg(long, default_value = "0.0.0.0:10000")]
    pub listen: SocketAddr,

    /// JSON-RPC status listen address.
    #[arg(long, default_value = "127.0.0.1:10001")]
    pub rpc_listen: SocketAddr,

    /// Registry size at which stale-peer eviction starts running.
    #[arg(long, default_value_t = DEFAULT_EVICTION_THRESHOLD)]
    pub eviction_threshold: usize,

    /// Number of newer connections after which a non-hosting peer is
    /// considered stale and evicted.
    #[arg(long, default_value_t = DEFAULT_STALENESS_WINDOW)]
    pub staleness_window: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
