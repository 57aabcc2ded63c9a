//! Core error types.
//!
//! Nothing in the signaling core is fatal: every failure path degrades to
//! dropping a peer or dropping a message. These types exist so callers can
//! log the reason instead of silently losing it.

use thiserror::Error;

use crate::peer::PeerId;

/// Errors surfaced by the signaling core.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The peer's transport task has gone away; its command channel is
    /// closed. Delivery is best effort, so callers log and move on.
    #[error("connection closed for {0}")]
    ConnectionClosed(PeerId),
}

/// Result type for signaling operations.
pub type SignalResult<T> = Result<T, SignalError>;
