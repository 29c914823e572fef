//! Transport abstraction layer for Crossline.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! how text lines reach a player. The game layers above only ever see
//! whole lines without their terminators.
//!
//! # Feature Flags
//!
//! - `lines` (default) — newline-delimited UTF-8 over TCP via
//!   `tokio-util`'s `LinesCodec`

mod error;
#[cfg(feature = "lines")]
mod line;

pub use error::TransportError;
#[cfg(feature = "lines")]
pub use line::{DEFAULT_MAX_LINE_LEN, LineConnection, LineTransport};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// A single connection that exchanges text lines with a peer.
///
/// The futures are `Send` so a connection can be driven from a spawned
/// Tokio task without knowing the concrete type.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one line to the remote peer. The terminator is appended.
    fn send(
        &self,
        line: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next line from the remote peer, without its terminator.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Flushes pending output and closes the write side.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
