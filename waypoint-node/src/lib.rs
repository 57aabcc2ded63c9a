//! Waypoint rendezvous server library.
//!
//! This library provides the transport layer and process harness around
//! the `waypoint-signal` core. It is used by the `waypoint-node` binary
//! and can also be embedded for testing: the node binds to port 0 in
//! tests and reports its actual addresses through oneshot channels.

pub mod cli;
pub mod config;
pub mod connection;
pub mod node;
pub mod rpc;
pub mod shutdown;
