//! Turn coordinator: an isolated Tokio task that owns the session.
//!
//! The coordinator is the only code that touches the board, the active
//! seat, or the phase. Player handlers talk to it through an mpsc channel
//! and it talks back through one unbounded channel per seat. Every state
//! change (move, verdict, vote, disconnect) is handled to completion,
//! including all of its outbound messages, before the next command is
//! read, so both players observe the same sequence of events.

use crossline_protocol::{Seat, ServerMessage, is_restart_vote, parse_position};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{Board, Phase, RoomError};

/// An outbound instruction from the coordinator to a player's handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Write this message to the player.
    Say(ServerMessage),
    /// The player is waiting on `active`. Handlers print at most one
    /// notice per uninterrupted run of these.
    Wait { active: Seat },
    /// Write this final message, then close the connection.
    Close(ServerMessage),
}

/// Channel sender for delivering outbound instructions to a player.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

/// Commands sent to the coordinator through its channel.
pub(crate) enum Command {
    /// Seat a player.
    Join {
        seat: Seat,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// A line the player typed.
    Submit { seat: Seat, line: String },

    /// The player's connection is gone.
    Disconnected { seat: Seat },

    /// Request a snapshot of the session.
    GetInfo { reply: oneshot::Sender<SessionInfo> },
}

/// A snapshot of the session, for observers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Current phase.
    pub phase: Phase,
    /// The seat allowed to move next.
    pub active_seat: Seat,
    /// Copy of the board.
    pub board: Board,
    /// Number of seats currently registered.
    pub seated: usize,
    /// Games that reached a win or draw.
    pub games_finished: u32,
}

/// Handle to the running coordinator. Cheap to clone.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    /// Registers a seat and the channel its handler listens on.
    pub async fn join(
        &self,
        seat: Seat,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::Join {
                seat,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Forwards a line typed by `seat` (fire-and-forget).
    pub async fn submit(
        &self,
        seat: Seat,
        line: String,
    ) -> Result<(), RoomError> {
        self.sender
            .send(Command::Submit { seat, line })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Reports that `seat`'s connection dropped.
    pub async fn disconnected(&self, seat: Seat) -> Result<(), RoomError> {
        self.sender
            .send(Command::Disconnected { seat })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests a snapshot of the session.
    pub async fn get_info(&self) -> Result<SessionInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }
}

/// Everything the session knows. Owned by the coordinator task alone.
struct SessionState {
    board: Board,
    active_seat: Seat,
    phase: Phase,
    /// Per-seat outbound channels, indexed by `Seat::index`.
    players: [Option<PlayerSender>; 2],
    /// Restart votes for the current round; cleared when voting opens.
    votes: [Option<bool>; 2],
    games_finished: u32,
}

impl SessionState {
    fn new() -> Self {
        Self {
            board: Board::new(),
            active_seat: Seat::FIRST,
            phase: Phase::AwaitingSecondPlayer,
            players: [None, None],
            votes: [None, None],
            games_finished: 0,
        }
    }
}

/// The coordinator actor. Runs inside a Tokio task.
struct Coordinator {
    state: SessionState,
    receiver: mpsc::Receiver<Command>,
}

impl Coordinator {
    /// Runs the actor loop until the session terminates or every handle
    /// is dropped. Returns the final snapshot.
    async fn run(mut self) -> SessionInfo {
        tracing::info!("session coordinator started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                Command::Join {
                    seat,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(seat, sender);
                    let _ = reply.send(result);
                }
                Command::Submit { seat, line } => {
                    self.handle_submit(seat, line);
                }
                Command::Disconnected { seat } => {
                    self.handle_disconnect(seat);
                }
                Command::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
            }

            if self.state.phase.is_terminal() {
                break;
            }
        }

        if !self.state.phase.is_terminal() {
            self.set_phase(Phase::Terminated);
        }
        tracing::info!(
            games = self.state.games_finished,
            "session coordinator stopped"
        );
        self.info()
    }

    fn handle_join(
        &mut self,
        seat: Seat,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if !self.state.phase.is_admitting() {
            return Err(RoomError::InvalidState(self.state.phase));
        }
        let slot = &mut self.state.players[seat.index()];
        if slot.is_some() {
            return Err(RoomError::SeatTaken(seat));
        }
        *slot = Some(sender);
        tracing::info!(%seat, mark = %seat.mark(), "player seated");

        if self.state.players.iter().all(Option::is_some) {
            self.start_game();
        } else {
            self.send_to(seat, Outbound::Say(ServerMessage::WaitingForOpponent));
        }
        Ok(())
    }

    fn start_game(&mut self) {
        self.set_phase(Phase::InProgress);
        self.broadcast(ServerMessage::GameStarting {
            board: self.state.board.render(),
        });
        self.notify_turn();
    }

    fn handle_submit(&mut self, seat: Seat, line: String) {
        match self.state.phase {
            phase if phase.accepts_moves() && seat == self.state.active_seat => {
                self.handle_move(seat, &line);
            }
            phase if phase.accepts_moves() => {
                tracing::debug!(%seat, "ignoring out-of-turn input");
                // Re-assert the wait; the handler suppresses the repeat.
                self.send_to(
                    seat,
                    Outbound::Wait {
                        active: self.state.active_seat,
                    },
                );
            }
            Phase::RestartVoting => self.handle_vote(seat, &line),
            _ => {
                tracing::debug!(%seat, phase = %self.state.phase, "ignoring input");
            }
        }
    }

    /// Parse → apply → broadcast → verdict, all under the one actor.
    fn handle_move(&mut self, seat: Seat, line: &str) {
        let position = match parse_position(line) {
            Ok(position) => position,
            Err(e) => {
                tracing::debug!(%seat, error = %e, "rejected move input");
                self.reprompt(seat, ServerMessage::InvalidInput);
                return;
            }
        };

        if let Err(e) = self.state.board.apply(position, seat.mark()) {
            tracing::debug!(%seat, error = %e, "rejected move");
            self.reprompt(seat, ServerMessage::InvalidMove);
            return;
        }

        tracing::debug!(%seat, position, "move applied");
        self.broadcast(ServerMessage::MoveMade { seat });
        self.broadcast(ServerMessage::CurrentBoard {
            board: self.state.board.render(),
        });

        if let Some(mark) = self.state.board.winner() {
            let winner = mark.seat();
            tracing::info!(%winner, "game won");
            self.broadcast(ServerMessage::Wins { seat: winner });
            self.open_voting();
        } else if self.state.board.is_full() {
            tracing::info!("game drawn");
            self.broadcast(ServerMessage::Draw);
            self.open_voting();
        } else {
            self.state.active_seat = self.state.active_seat.other();
            self.notify_turn();
        }
    }

    /// Tells the submitter what was wrong and asks again. The other seat
    /// hears nothing.
    fn reprompt(&self, seat: Seat, reason: ServerMessage) {
        self.send_to(seat, Outbound::Say(reason));
        self.send_to(seat, Outbound::Say(ServerMessage::YourTurn));
    }

    /// Pushes "your turn" to the active seat and "wait" to the other.
    fn notify_turn(&self) {
        let active = self.state.active_seat;
        self.send_to(active, Outbound::Say(ServerMessage::YourTurn));
        self.send_to(active.other(), Outbound::Wait { active });
    }

    /// Both seats have already been sent the verdict when this runs, so
    /// no one is asked to vote before they know the game ended.
    fn open_voting(&mut self) {
        self.state.games_finished += 1;
        self.state.votes = [None, None];
        self.set_phase(Phase::RestartVoting);
        self.broadcast(ServerMessage::RestartInstructions);
        for seat in Seat::ALL {
            self.send_to(seat, Outbound::Say(ServerMessage::RestartPrompt { seat }));
        }
    }

    fn handle_vote(&mut self, seat: Seat, line: &str) {
        let vote = &mut self.state.votes[seat.index()];
        if vote.is_some() {
            tracing::debug!(%seat, "ignoring repeated vote");
            return;
        }
        let restart = is_restart_vote(line);
        *vote = Some(restart);
        tracing::debug!(%seat, restart, "vote recorded");

        match self.state.votes {
            [Some(true), Some(true)] => self.restart_game(),
            [Some(_), Some(_)] => {
                tracing::info!("restart declined");
                self.terminate(ServerMessage::GameOver);
            }
            _ => {}
        }
    }

    fn restart_game(&mut self) {
        self.state.board.reset();
        self.state.active_seat = Seat::FIRST;
        self.set_phase(Phase::InProgress);
        tracing::info!("both players agreed to restart");
        self.broadcast(ServerMessage::RestartAgreed);
        self.broadcast(ServerMessage::NewGame {
            board: self.state.board.render(),
        });
        self.notify_turn();
    }

    fn handle_disconnect(&mut self, seat: Seat) {
        if self.state.phase.is_terminal() {
            return;
        }
        tracing::info!(%seat, phase = %self.state.phase, "player disconnected");
        self.state.players[seat.index()] = None;
        self.terminate(ServerMessage::PeerDisconnected { seat });
    }

    /// Ends the session, giving every still-seated player a final line.
    fn terminate(&mut self, reason: ServerMessage) {
        self.set_phase(Phase::Terminated);
        for seat in Seat::ALL {
            self.send_to(seat, Outbound::Close(reason.clone()));
        }
    }

    fn set_phase(&mut self, next: Phase) {
        debug_assert!(
            self.state.phase.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state.phase,
            next
        );
        tracing::debug!(from = %self.state.phase, to = %next, "phase change");
        self.state.phase = next;
    }

    /// Sends a message to every seated player, seat 0 first.
    fn broadcast(&self, msg: ServerMessage) {
        for seat in Seat::ALL {
            self.send_to(seat, Outbound::Say(msg.clone()));
        }
    }

    /// Sends to a single seat. Silently drops if the seat is empty or
    /// its handler is gone.
    fn send_to(&self, seat: Seat, msg: Outbound) {
        if let Some(sender) = &self.state.players[seat.index()] {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            phase: self.state.phase,
            active_seat: self.state.active_seat,
            board: self.state.board.clone(),
            seated: self.state.players.iter().flatten().count(),
            games_finished: self.state.games_finished,
        }
    }
}

/// Spawns the coordinator task and returns a handle plus the task's
/// join handle, which resolves to the final snapshot.
///
/// `channel_size` bounds the command queue; handlers wait when it is full.
pub fn spawn_coordinator(
    channel_size: usize,
) -> (CoordinatorHandle, JoinHandle<SessionInfo>) {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = Coordinator {
        state: SessionState::new(),
        receiver: rx,
    };

    let task = tokio::spawn(actor.run());
    (CoordinatorHandle { sender: tx }, task)
}
