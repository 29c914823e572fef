//! Terminal client.
//!
//! Echoes every server line to stdout, collapses repeated waiting lines,
//! and reads one reply from stdin whenever the server asks for a move or
//! a restart vote.

use std::io::Write;

use crossline_transport::{Connection, LineConnection, TransportError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::CrosslineError;

const WAITING_MARKER: &str = "Waiting for Player";
const TURN_MARKER: &str = "Your turn.";
const RESTART_MARKER: &str = "do you want to restart";

/// What the server is asking the player for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Move,
    Restart,
}

impl Prompt {
    /// Text printed (without a newline) before reading the reply.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Move => "Enter a position (0-8): ",
            Self::Restart => "Enter your choice (1 to restart, any other key to exit): ",
        }
    }
}

/// How the client should react to one server line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Whether to print the line.
    pub print: bool,
    /// Whether to read a reply from stdin afterwards.
    pub prompt: Option<Prompt>,
}

/// Line filter state for the terminal client.
#[derive(Debug, Default)]
pub struct ClientView {
    waiting_shown: bool,
}

impl ClientView {
    /// Decides what to do with a line received from the server.
    pub fn observe(&mut self, line: &str) -> Step {
        let waiting = line.contains(WAITING_MARKER);
        if waiting && self.waiting_shown {
            return Step {
                print: false,
                prompt: None,
            };
        }
        self.waiting_shown = waiting;

        let prompt = if line.contains(RESTART_MARKER) {
            Some(Prompt::Restart)
        } else if line.starts_with(TURN_MARKER) {
            Some(Prompt::Move)
        } else {
            None
        };

        Step {
            print: true,
            prompt,
        }
    }
}

/// Connects to `addr` and plays from the terminal until the server closes.
pub async fn play(addr: &str, max_line_len: usize) -> Result<(), CrosslineError> {
    let conn = LineConnection::connect(addr, max_line_len).await?;
    println!("Connected to Tic-Tac-Toe server!");
    tracing::debug!(peer = %conn.peer_addr(), "connected");

    play_with(&conn, BufReader::new(tokio::io::stdin())).await
}

/// Runs the client loop over an open connection, reading replies from
/// `input`.
///
/// Returns when the server closes the connection, or when `input` runs
/// dry while the server is waiting for a reply. In the latter case the
/// connection is closed, which the server treats as leaving the game.
pub async fn play_with<C, R>(conn: &C, input: R) -> Result<(), CrosslineError>
where
    C: Connection,
    CrosslineError: From<C::Error>,
    R: AsyncBufRead + Unpin,
{
    let mut input = input.lines();
    let mut view = ClientView::default();

    while let Some(line) = conn.recv().await? {
        let step = view.observe(&line);
        if step.print {
            println!("{line}");
        }
        let Some(prompt) = step.prompt else {
            continue;
        };
        print!("{}", prompt.hint());
        let _ = std::io::stdout().flush();

        match input.next_line().await.map_err(TransportError::ReceiveFailed)? {
            Some(reply) => conn.send(&reply).await?,
            None => {
                println!();
                tracing::debug!("input closed, leaving the game");
                conn.close().await?;
                return Ok(());
            }
        }
    }

    tracing::debug!("server closed the connection");
    Ok(())
}
