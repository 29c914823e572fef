//! Interpreting player replies.
//!
//! Players answer prompts with a single line. A move reply must be a
//! number; a restart reply is a yes only when it is exactly `1`.

use crate::ProtocolError;

/// The reply that means "play again".
pub const RESTART_YES: &str = "1";

/// Parses a move reply into a raw board position.
///
/// Only the number is checked here. Range checking belongs to the board,
/// which reports `-1` or `9` as an invalid move rather than bad input.
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [`ProtocolError::InvalidInput`] if the text is not an integer.
pub fn parse_position(line: &str) -> Result<i64, ProtocolError> {
    line.trim()
        .parse::<i64>()
        .map_err(|_| ProtocolError::InvalidInput(line.to_string()))
}

/// Returns `true` if the reply is a vote to restart.
///
/// Any other text, including an empty line, is a vote to stop.
pub fn is_restart_vote(line: &str) -> bool {
    line.trim() == RESTART_YES
}
