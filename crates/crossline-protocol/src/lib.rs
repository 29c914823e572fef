//! Line protocol for Crossline.
//!
//! This crate defines the "language" that players and the server speak:
//!
//! - **Types** ([`Seat`], [`Mark`]) — who is playing and with which symbol.
//! - **Messages** ([`ServerMessage`]) — every line the server can send,
//!   with its exact wire text.
//! - **Parsing** ([`parse_position`], [`is_restart_vote`]) — how reply
//!   lines are interpreted.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while parsing.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw lines) and the room
//! (game state). It doesn't know about connections or boards.
//!
//! ```text
//! Transport (lines) → Protocol (ServerMessage / replies) → Room (board, turns)
//! ```

mod error;
mod message;
mod parse;
mod types;

pub use error::ProtocolError;
pub use message::ServerMessage;
pub use parse::{is_restart_vote, parse_position, RESTART_YES};
pub use types::{Mark, Seat};
