//! Integration tests for the Crossline server, handler, and full
//! connection flow, driven by plain TCP clients.

use std::net::SocketAddr;
use std::time::Duration;

use crossline::prelude::*;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;
use tokio::time::timeout;

// =========================================================================
// Helpers
// =========================================================================

const STEP: Duration = Duration::from_secs(5);
const EMPTY_ROW: &str = "- | - | -";
const TURN: &str = "Your turn. Enter a position (0-8):";

type ServerTask = JoinHandle<Result<SessionInfo, CrosslineError>>;

/// A test player speaking raw lines over TCP.
struct Player {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Player {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("should connect");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn line(&mut self) -> String {
        timeout(STEP, self.lines.next_line())
            .await
            .expect("server should answer in time")
            .expect("read should succeed")
            .expect("connection should be open")
    }

    async fn expect(&mut self, text: &str) {
        assert_eq!(self.line().await, text);
    }

    /// Reads a header line followed by a rendered board and its blank line.
    async fn expect_board(&mut self, header: &str) -> [String; 3] {
        self.expect(header).await;
        let rows = [self.line().await, self.line().await, self.line().await];
        self.expect("").await;
        rows
    }

    async fn send(&mut self, text: &str) {
        self.writer
            .write_all(format!("{text}\n").as_bytes())
            .await
            .expect("write should succeed");
    }

    /// Asserts the server closed this connection.
    async fn expect_closed(&mut self) {
        let next = timeout(STEP, self.lines.next_line())
            .await
            .expect("server should close in time");
        assert!(matches!(next, Ok(None) | Err(_)), "got {next:?}");
    }
}

async fn start_server(builder: CrosslineServerBuilder) -> (SocketAddr, ServerTask) {
    let server = builder.bind("127.0.0.1:0").build().await.expect("should bind");
    let addr = server.local_addr().expect("local addr");
    (addr, tokio::spawn(server.run()))
}

/// Seats two players and reads everything up to the first move prompt.
async fn seated_pair(builder: CrosslineServerBuilder) -> (ServerTask, Player, Player) {
    let (addr, server) = start_server(builder).await;

    let mut first = Player::connect(addr).await;
    first.expect("Welcome to Tic-Tac-Toe! You are Player 1").await;
    first.expect("Waiting for another player to join...").await;

    let mut second = Player::connect(addr).await;
    second.expect("Welcome to Tic-Tac-Toe! You are Player 2").await;

    for player in [&mut first, &mut second] {
        let rows = player.expect_board("Game starting!").await;
        assert_eq!(rows, [EMPTY_ROW; 3]);
    }
    first.expect(TURN).await;
    second.expect("Waiting for Player 1's turn.").await;

    (server, first, second)
}

/// Plays `positions` alternating Player 1, Player 2, … and checks the
/// announcements. The caller reads whatever follows the last move.
async fn play(players: &mut [Player; 2], positions: &[u8]) {
    for (turn, pos) in positions.iter().enumerate() {
        let mover = turn % 2;
        let announce = format!("Player {} made a move.", mover + 1);
        players[mover].send(&pos.to_string()).await;

        for player in players.iter_mut() {
            player.expect(&announce).await;
            player.expect_board("Current board:").await;
        }

        if turn + 1 < positions.len() {
            let waiting = format!("Waiting for Player {}'s turn.", 2 - mover);
            players[mover].expect(&waiting).await;
            players[1 - mover].expect(TURN).await;
        }
    }
}

/// Reads the end-of-game block for one player.
async fn expect_verdict(player: &mut Player, verdict: &str, seat_number: usize) {
    player.expect(verdict).await;
    player
        .expect("Enter 1 to restart the game or any other key to exit.")
        .await;
    player
        .expect(&format!("Player {seat_number}, do you want to restart?"))
        .await;
}

async fn finish(server: ServerTask) -> SessionInfo {
    timeout(STEP, server)
        .await
        .expect("server should stop in time")
        .expect("server task should not panic")
        .expect("server should finish cleanly")
}

// =========================================================================
// Lobby
// =========================================================================

#[tokio::test]
async fn test_first_player_waits_alone() {
    let (addr, _server) = start_server(CrosslineServer::builder()).await;
    let mut first = Player::connect(addr).await;
    first.expect("Welcome to Tic-Tac-Toe! You are Player 1").await;
    first.expect("Waiting for another player to join...").await;
}

#[tokio::test]
async fn test_game_starts_when_second_player_arrives() {
    let (_server, _first, _second) = seated_pair(CrosslineServer::builder()).await;
}

#[tokio::test]
async fn test_third_connection_gets_nothing() {
    let (addr, _server) = start_server(CrosslineServer::builder()).await;
    let mut first = Player::connect(addr).await;
    first.expect("Welcome to Tic-Tac-Toe! You are Player 1").await;
    let mut second = Player::connect(addr).await;
    second.expect("Welcome to Tic-Tac-Toe! You are Player 2").await;

    match TcpStream::connect(addr).await {
        Err(_) => {}
        Ok(mut third) => {
            let mut buf = [0u8; 64];
            let read = timeout(Duration::from_millis(500), third.read(&mut buf)).await;
            assert!(
                matches!(read, Ok(Ok(0)) | Ok(Err(_)) | Err(_)),
                "third connection should never be served: {read:?}"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_arrivals_only_seat_zero_waits() {
    for _ in 0..20 {
        let (addr, _server) = start_server(CrosslineServer::builder()).await;
        let (mut a, mut b) = tokio::join!(Player::connect(addr), Player::connect(addr));

        // Either socket may have been accepted first; the welcome says which.
        let (welcome_a, welcome_b) = tokio::join!(a.line(), b.line());
        let (mut first, mut second) = if welcome_a.ends_with("Player 1") {
            assert_eq!(welcome_b, "Welcome to Tic-Tac-Toe! You are Player 2");
            (a, b)
        } else {
            assert_eq!(welcome_b, "Welcome to Tic-Tac-Toe! You are Player 1");
            (b, a)
        };

        first.expect("Waiting for another player to join...").await;
        first.expect_board("Game starting!").await;
        first.expect(TURN).await;

        second.expect_board("Game starting!").await;
        second.expect("Waiting for Player 1's turn.").await;
    }
}

#[tokio::test]
async fn test_lone_player_leaving_ends_session() {
    let (addr, server) = start_server(CrosslineServer::builder()).await;
    let mut first = Player::connect(addr).await;
    first.expect("Welcome to Tic-Tac-Toe! You are Player 1").await;
    first.expect("Waiting for another player to join...").await;
    drop(first);

    let outcome = finish(server).await;
    assert_eq!(outcome.phase, Phase::Terminated);
    assert_eq!(outcome.games_finished, 0);
}

// =========================================================================
// Turns
// =========================================================================

#[tokio::test]
async fn test_moves_are_announced_to_both_players() {
    let (_server, first, second) = seated_pair(CrosslineServer::builder()).await;
    let mut players = [first, second];

    players[0].send("4").await;
    for player in players.iter_mut() {
        player.expect("Player 1 made a move.").await;
        let rows = player.expect_board("Current board:").await;
        assert_eq!(rows, [EMPTY_ROW, "- | X | -", EMPTY_ROW]);
    }
    players[0].expect("Waiting for Player 2's turn.").await;
    players[1].expect(TURN).await;
}

#[tokio::test]
async fn test_bad_input_reprompts_only_the_mover() {
    let (_server, mut first, mut second) = seated_pair(CrosslineServer::builder()).await;

    first.send("abc").await;
    first
        .expect("Invalid input. Enter a number between 0 and 8.")
        .await;
    first.expect(TURN).await;

    first.send("9").await;
    first.expect("Invalid move. Try again.").await;
    first.expect(TURN).await;

    first.send("0").await;
    second.expect("Player 1 made a move.").await;
    second.expect_board("Current board:").await;
    second.expect(TURN).await;

    second.send("0").await;
    second.expect("Invalid move. Try again.").await;
    second.expect(TURN).await;
}

#[tokio::test]
async fn test_out_of_turn_input_is_ignored_silently() {
    let (_server, mut first, mut second) = seated_pair(CrosslineServer::builder()).await;

    second.send("4").await;
    second.send("5").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    first.send("0").await;

    // No repeated waiting line, and cell 4 stayed empty.
    second.expect("Player 1 made a move.").await;
    let rows = second.expect_board("Current board:").await;
    assert_eq!(rows, ["X | - | -", EMPTY_ROW, EMPTY_ROW]);
    second.expect(TURN).await;
}

#[tokio::test]
async fn test_surrounding_whitespace_is_accepted() {
    let (_server, mut first, _second) = seated_pair(CrosslineServer::builder()).await;

    first.send("  8 ").await;
    first.expect("Player 1 made a move.").await;
    let rows = first.expect_board("Current board:").await;
    assert_eq!(rows[2], "- | - | X");
}

// =========================================================================
// Verdicts and restart
// =========================================================================

#[tokio::test]
async fn test_win_then_decline_ends_session() {
    let (server, first, second) = seated_pair(CrosslineServer::builder()).await;
    let mut players = [first, second];

    play(&mut players, &[0, 3, 1, 4, 2]).await;
    expect_verdict(&mut players[0], "Player 1 wins!", 1).await;
    expect_verdict(&mut players[1], "Player 1 wins!", 2).await;

    players[0].send("1").await;
    players[1].send("n").await;
    for player in players.iter_mut() {
        player
            .expect("Game over. One or both players chose to exit.")
            .await;
        player.expect_closed().await;
    }

    let outcome = finish(server).await;
    assert_eq!(outcome.phase, Phase::Terminated);
    assert_eq!(outcome.games_finished, 1);
}

#[tokio::test]
async fn test_draw_is_announced() {
    let (_server, first, second) = seated_pair(CrosslineServer::builder()).await;
    let mut players = [first, second];

    play(&mut players, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).await;
    expect_verdict(&mut players[0], "It's a draw!", 1).await;
    expect_verdict(&mut players[1], "It's a draw!", 2).await;
}

#[tokio::test]
async fn test_both_agree_to_restart() {
    let (_server, first, second) = seated_pair(CrosslineServer::builder()).await;
    let mut players = [first, second];

    play(&mut players, &[3, 0, 4, 1, 8, 2]).await;
    expect_verdict(&mut players[0], "Player 2 wins!", 1).await;
    expect_verdict(&mut players[1], "Player 2 wins!", 2).await;

    players[1].send("1").await;
    players[0].send(" 1 ").await;
    for player in players.iter_mut() {
        player
            .expect("Both players agreed to restart! Resetting the game...")
            .await;
        let rows = player.expect_board("New game starting!").await;
        assert_eq!(rows, [EMPTY_ROW; 3]);
    }

    // Player 1 opens the new game regardless of who won.
    players[0].expect(TURN).await;
    players[1].expect("Waiting for Player 1's turn.").await;

    play(&mut players, &[4]).await;
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_disconnect_mid_game_notifies_opponent() {
    let (server, mut first, second) = seated_pair(CrosslineServer::builder()).await;

    drop(second);
    first.expect("Player 2 disconnected. Game over.").await;
    first.expect_closed().await;

    let outcome = finish(server).await;
    assert_eq!(outcome.phase, Phase::Terminated);
}

#[tokio::test]
async fn test_disconnect_during_vote_notifies_opponent() {
    let (server, first, second) = seated_pair(CrosslineServer::builder()).await;
    let mut players = [first, second];

    play(&mut players, &[0, 3, 1, 4, 2]).await;
    expect_verdict(&mut players[0], "Player 1 wins!", 1).await;
    expect_verdict(&mut players[1], "Player 1 wins!", 2).await;

    let [mut first, second] = players;
    drop(second);
    first.expect("Player 2 disconnected. Game over.").await;
    first.expect_closed().await;

    let outcome = finish(server).await;
    assert_eq!(outcome.games_finished, 1);
}

#[tokio::test]
async fn test_oversized_line_drops_sender() {
    let builder = CrosslineServer::builder().max_line_len(16);
    let (server, mut first, mut second) = seated_pair(builder).await;

    first.send(&"7".repeat(64)).await;
    second.expect("Player 1 disconnected. Game over.").await;
    second.expect_closed().await;

    finish(server).await;
}
