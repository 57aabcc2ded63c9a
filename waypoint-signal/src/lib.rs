//! Matchmaking core for the Waypoint rendezvous server.
//!
//! This crate implements the signaling state machine that pairs two
//! endpoints sharing an address identifier and relays opaque negotiation
//! payloads between them until they report a direct connection:
//!
//! - Peer registry: one entry per live connection, insertion ordered
//! - Command dispatch: strict parsing of the line-oriented text protocol
//! - Matcher: binds a host and a joiner declaring the same address
//! - Relay: forwards payloads between a confirmed pair, best effort
//! - Evictor: bounds registry growth by discarding stale non-hosts
//!
//! # Architecture
//!
//! The core owns no sockets. A peer's connection is represented by an
//! unbounded command channel into its transport task; the transport layer
//! (see `waypoint-node`) funnels connect/message/disconnect events into a
//! single task that drives [`SignalHub`], so all registry access is
//! strictly serialized and no locking is needed here.

pub mod config;
pub mod error;
pub mod hub;
pub mod peer;
pub mod protocol;
pub mod registry;

// Re-export main types
pub use config::SignalConfig;
pub use error::{SignalError, SignalResult};
pub use hub::SignalHub;
pub use peer::{Peer, PeerCommand, PeerId, PeerState};
pub use protocol::{Command, Frame};
pub use registry::Registry;
