//! Unified error type for the Crossline server.

use crossline_room::RoomError;
use crossline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Every variant other than `Config` ends a session the same way a lost
/// connection does; none of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum CrosslineError {
    /// A transport-level error (accept, send, recv, oversized line).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A room-level error (seat taken, coordinator gone).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The session task panicked or was cancelled.
    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
