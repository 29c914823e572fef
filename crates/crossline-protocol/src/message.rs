//! Every line the server sends to a player.
//!
//! The text of each variant is part of the wire contract: the terminal
//! client keys its behavior off prefixes and substrings of these lines
//! (`Your turn.`, `Waiting for Player`, `do you want to restart`), so the
//! `Display` output must stay byte-for-byte stable.

use std::fmt;

use crate::Seat;

/// A server-to-player message.
///
/// Board-carrying variants hold the already rendered board text. A
/// rendered board ends with a line break, so those messages span several
/// wire lines followed by an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// First line on every connection.
    Welcome { seat: Seat },
    /// Sent to a seated player while the other seat is still empty.
    WaitingForOpponent,
    /// Both seats filled; the first game begins.
    GameStarting { board: String },
    /// Announces that a seat placed a mark.
    MoveMade { seat: Seat },
    /// Board snapshot after a move.
    CurrentBoard { board: String },
    /// The receiving seat may move now.
    YourTurn,
    /// The receiving seat must wait for `active` to move.
    WaitingForTurn { active: Seat },
    /// The position was out of range or already taken.
    InvalidMove,
    /// The reply was not a number.
    InvalidInput,
    /// A seat completed a line.
    Wins { seat: Seat },
    /// The board filled with no winner.
    Draw,
    /// Broadcast once when voting opens.
    RestartInstructions,
    /// Per-seat vote request.
    RestartPrompt { seat: Seat },
    /// Both seats voted to play again.
    RestartAgreed,
    /// Fresh board after a successful restart vote.
    NewGame { board: String },
    /// At least one seat declined to play again.
    GameOver,
    /// The other seat's connection dropped.
    PeerDisconnected { seat: Seat },
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome { seat } => {
                write!(f, "Welcome to Tic-Tac-Toe! You are {seat}")
            }
            Self::WaitingForOpponent => {
                write!(f, "Waiting for another player to join...")
            }
            Self::GameStarting { board } => {
                write!(f, "Game starting!\n{board}")
            }
            Self::MoveMade { seat } => write!(f, "{seat} made a move."),
            Self::CurrentBoard { board } => {
                write!(f, "Current board:\n{board}")
            }
            Self::YourTurn => write!(f, "Your turn. Enter a position (0-8):"),
            Self::WaitingForTurn { active } => {
                write!(f, "Waiting for {active}'s turn.")
            }
            Self::InvalidMove => write!(f, "Invalid move. Try again."),
            Self::InvalidInput => {
                write!(f, "Invalid input. Enter a number between 0 and 8.")
            }
            Self::Wins { seat } => write!(f, "{seat} wins!"),
            Self::Draw => write!(f, "It's a draw!"),
            Self::RestartInstructions => write!(
                f,
                "Enter 1 to restart the game or any other key to exit."
            ),
            Self::RestartPrompt { seat } => {
                write!(f, "{seat}, do you want to restart?")
            }
            Self::RestartAgreed => write!(
                f,
                "Both players agreed to restart! Resetting the game..."
            ),
            Self::NewGame { board } => write!(f, "New game starting!\n{board}"),
            Self::GameOver => {
                write!(f, "Game over. One or both players chose to exit.")
            }
            Self::PeerDisconnected { seat } => {
                write!(f, "{seat} disconnected. Game over.")
            }
        }
    }
}
