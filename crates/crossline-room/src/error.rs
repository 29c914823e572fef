//! Error types for the room layer.

use crossline_protocol::Seat;

use crate::Phase;

/// Why a move was rejected by the board. Recoverable: the same seat
/// is asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The position is outside 0–8.
    #[error("position {0} is off the board")]
    InvalidMove(i64),

    /// The cell already holds a mark.
    #[error("cell {0} is occupied")]
    CellOccupied(usize),
}

/// Errors that can occur when talking to the session coordinator.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Another connection already registered for this seat.
    #[error("{0} is already seated")]
    SeatTaken(Seat),

    /// The session is in a phase that doesn't allow this operation.
    #[error("invalid phase for this operation: {0}")]
    InvalidState(Phase),

    /// The coordinator's command channel is closed (session over).
    #[error("session coordinator is unavailable")]
    Unavailable,
}
