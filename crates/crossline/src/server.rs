//! `CrosslineServer` builder and the two-seat lobby.
//!
//! This is the entry point for running a game. It ties together all the
//! layers: transport → handler → coordinator.

use crossline_protocol::Seat;
use crossline_room::{CoordinatorHandle, Outbound, SessionInfo, spawn_coordinator};
use crossline_transport::{Connection, LineConnection, LineTransport, Transport};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

use crate::handler::handle_player;
use crate::{CrosslineError, ServerConfig};

/// Builder for configuring and starting a Crossline server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), crossline::CrosslineError> {
/// use crossline::CrosslineServer;
///
/// let server = CrosslineServer::builder()
///     .bind("127.0.0.1:12345")
///     .build()
///     .await?;
/// let outcome = server.run().await?;
/// println!("played {} games", outcome.games_finished);
/// # Ok(())
/// # }
/// ```
pub struct CrosslineServerBuilder {
    config: ServerConfig,
}

impl CrosslineServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces every setting with `config`.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the longest inbound line a player may send.
    pub fn max_line_len(mut self, max_line_len: usize) -> Self {
        self.config.max_line_len = max_line_len;
        self
    }

    /// Binds the listener.
    pub async fn build(self) -> Result<CrosslineServer, CrosslineError> {
        let transport = LineTransport::bind(&self.config.bind_addr)
            .await?
            .with_max_line_len(self.config.max_line_len);

        Ok(CrosslineServer {
            transport,
            config: self.config,
        })
    }
}

impl Default for CrosslineServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Crossline server that hosts exactly one session.
///
/// Call [`run()`](Self::run) to admit two players and play until the
/// session ends.
pub struct CrosslineServer {
    transport: LineTransport,
    config: ServerConfig,
}

impl CrosslineServer {
    /// Creates a new builder.
    pub fn builder() -> CrosslineServerBuilder {
        CrosslineServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the lobby, then waits for the session to finish.
    ///
    /// The first accepted connection takes seat 0 and the second seat 1.
    /// Each seat is registered with the coordinator before the next
    /// connection is accepted, so seat 0 is always the one told to wait.
    /// After that the listener is closed, so later connection attempts
    /// are refused. Returns the coordinator's final snapshot once both
    /// handlers have finished writing their last lines.
    pub async fn run(mut self) -> Result<SessionInfo, CrosslineError> {
        tracing::info!(queue = self.config.command_queue, "Crossline server running");

        let (coordinator, mut session) = spawn_coordinator(self.config.command_queue);
        let mut handlers = Vec::with_capacity(Seat::ALL.len());
        let mut seats = Seat::ALL.into_iter();
        let mut next_seat = seats.next();

        while let Some(seat) = next_seat {
            tokio::select! {
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        tracing::info!(
                            %seat,
                            conn_id = %conn.id(),
                            peer = %conn.peer_addr(),
                            "player connected"
                        );
                        let (tx, inbox) = mpsc::unbounded_channel();
                        match coordinator.join(seat, tx).await {
                            Ok(()) => {
                                tracing::debug!(%seat, "seat registered");
                                handlers.push(spawn_handler(conn, seat, inbox, coordinator.clone()));
                                next_seat = seats.next();
                            }
                            // The session is already over; the next pass
                            // picks up its result.
                            Err(e) => tracing::warn!(%seat, error = %e, "could not seat player"),
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
                finished = &mut session => {
                    // The only way to get here is a seated player leaving
                    // before the other seat filled.
                    tracing::info!("session ended before both seats were filled");
                    join_handlers(handlers).await;
                    return Ok(finished?);
                }
            }
        }

        drop(self.transport);
        tracing::info!("both seats filled, lobby closed");

        drop(coordinator);
        let outcome = session.await?;
        join_handlers(handlers).await;
        tracing::info!(games = outcome.games_finished, "session finished");
        Ok(outcome)
    }
}

fn spawn_handler(
    conn: LineConnection,
    seat: Seat,
    inbox: UnboundedReceiver<Outbound>,
    coordinator: CoordinatorHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = handle_player(conn, seat, inbox, coordinator).await {
            tracing::debug!(%seat, error = %e, "player handler ended with error");
        }
    })
}

async fn join_handlers(handlers: Vec<JoinHandle<()>>) {
    for handler in handlers {
        if let Err(e) = handler.await {
            tracing::warn!(error = %e, "player handler task failed");
        }
    }
}
