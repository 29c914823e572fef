//! # Crossline
//!
//! Two-player tic-tac-toe over newline-delimited TCP.
//!
//! A server hosts exactly one session: the first connection plays `X`,
//! the second plays `O`, and after that the listener closes. Players
//! alternate moves by typing a cell index, and after each finished game
//! both are asked whether to play again.
//!
//! The workspace is layered:
//! - [`crossline_transport`]: line-framed TCP connections
//! - [`crossline_protocol`]: seats, marks, and the text of every server line
//! - [`crossline_room`]: the board and the session coordinator task
//! - this crate: the lobby, per-player handlers, config, and the terminal client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crossline::prelude::*;
//!
//! # async fn demo() -> Result<(), CrosslineError> {
//! let server = CrosslineServer::builder()
//!     .bind("0.0.0.0:12345")
//!     .build()
//!     .await?;
//! let outcome = server.run().await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod handler;
pub mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use crossline_transport::DEFAULT_MAX_LINE_LEN;
pub use error::CrosslineError;
pub use server::{CrosslineServer, CrosslineServerBuilder};

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::client::{ClientView, Prompt};
    pub use crate::{CrosslineError, CrosslineServer, CrosslineServerBuilder, ServerConfig};
    pub use crossline_protocol::{Mark, Seat, ServerMessage};
    pub use crossline_room::{Board, Phase, SessionInfo};
    pub use crossline_transport::{Connection, LineConnection};
}
