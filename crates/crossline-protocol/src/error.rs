//! Error types for the protocol layer.

/// Errors that can occur while interpreting a player's reply line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The reply was not a number. Recoverable: the player is re-prompted.
    #[error("invalid input: {0:?}")]
    InvalidInput(String),
}
