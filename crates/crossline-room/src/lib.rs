//! Board rules and session coordination for Crossline.
//!
//! The session runs as a single Tokio task (actor model) that owns the
//! board, the turn order, and the phase. Player handlers never touch that
//! state; they send commands and receive [`Outbound`] instructions.
//!
//! # Key types
//!
//! - [`Board`] — the 3×3 grid, move rules, win/draw evaluation
//! - [`Phase`] — session lifecycle state machine
//! - [`CoordinatorHandle`] — send commands to the running coordinator
//! - [`Outbound`] — what the coordinator asks a handler to do

mod board;
mod coordinator;
mod error;
mod phase;

pub use board::{Board, CELLS, Cell};
pub use coordinator::{CoordinatorHandle, Outbound, PlayerSender, SessionInfo, spawn_coordinator};
pub use error::{MoveError, RoomError};
pub use phase::Phase;
