//! Per-connection handler: welcome, seating, and line routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The lobby has already registered the seat with the coordinator and
//! hands over the seat's inbox, so anything the coordinator said in the
//! meantime is buffered there. The flow is:
//!   1. Send the welcome line naming the seat
//!   2. Loop: write whatever the coordinator pushes, forward whatever the
//!      player types, until the coordinator closes the seat or the
//!      connection drops
//!
//! The handler never decides anything about the game. It suspends on
//! two things only: the coordinator's channel and the socket.

use crossline_protocol::{Seat, ServerMessage};
use crossline_room::{CoordinatorHandle, Outbound};
use crossline_transport::Connection;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::CrosslineError;

/// Drop guard that reports the seat as disconnected when the handler exits.
///
/// This covers every exit path, including errors and panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async send. If
/// the session already ended the coordinator is gone and the send is a
/// no-op.
struct SeatGuard {
    seat: Seat,
    coordinator: CoordinatorHandle,
}

impl Drop for SeatGuard {
    fn drop(&mut self) {
        let seat = self.seat;
        let coordinator = self.coordinator.clone();
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                let _ = coordinator.disconnected(seat).await;
            });
        }
    }
}

/// Tracks whether the "waiting" notice was already written for the
/// current wait period, so repeats are suppressed server-side.
#[derive(Debug, Default)]
struct WaitNotice {
    shown: bool,
}

impl WaitNotice {
    /// Returns `true` if the notice should be written now.
    fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.shown, true)
    }

    /// Any other output ends the wait period.
    fn end(&mut self) {
        self.shown = false;
    }
}

/// Handles a single seated connection from welcome to close.
pub(crate) async fn handle_player<C>(
    conn: C,
    seat: Seat,
    mut inbox: UnboundedReceiver<Outbound>,
    coordinator: CoordinatorHandle,
) -> Result<(), CrosslineError>
where
    C: Connection,
    CrosslineError: From<C::Error>,
{
    let conn_id = conn.id();
    let _guard = SeatGuard {
        seat,
        coordinator: coordinator.clone(),
    };

    conn.send(&ServerMessage::Welcome { seat }.to_string()).await?;

    let mut notice = WaitNotice::default();

    loop {
        // Coordinator output first, so a final line is never lost to a
        // line the player typed at the same moment.
        tokio::select! {
            biased;

            outbound = inbox.recv() => {
                let Some(outbound) = outbound else {
                    tracing::debug!(%seat, "coordinator stopped");
                    break;
                };
                match outbound {
                    Outbound::Say(msg) => {
                        notice.end();
                        conn.send(&msg.to_string()).await?;
                    }
                    Outbound::Wait { active } => {
                        if notice.begin() {
                            let msg = ServerMessage::WaitingForTurn { active };
                            conn.send(&msg.to_string()).await?;
                        }
                    }
                    Outbound::Close(msg) => {
                        conn.send(&msg.to_string()).await?;
                        break;
                    }
                }
            }
            line = conn.recv() => {
                match line? {
                    Some(line) => {
                        // Fails only once the session is over; its final
                        // line is still waiting in the inbox.
                        if let Err(e) = coordinator.submit(seat, line).await {
                            tracing::debug!(%seat, error = %e, "input after session end");
                        }
                    }
                    None => {
                        tracing::info!(%conn_id, %seat, "connection closed by player");
                        return Ok(());
                    }
                }
            }
        }
    }

    conn.close().await?;
    tracing::debug!(%conn_id, %seat, "connection closed");
    Ok(())
}
