//! Networking Tests
//!
//! Offline gateway behaviour, reply decoding and the async driver running
//! full games against the offline coach.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shakmaty::Chess;

use coachboard::game::resources::{PositionStore, START_FEN};
use coachboard::game::{
    CoachingIntensity, CoachingParams, GameError, GameSession, GamePhase, GatewayCall,
    InputEvent, MoveOutcome, Outcome, SessionMode, Ticket,
};
use coachboard::networking::client::decode_reply;
use coachboard::networking::{
    run_call, CoachingGateway, GatewayError, GatewayRequest, GatewayResult, InFlightCalls,
    OfflineGateway, SessionDriver,
};
use shared::protocol::{
    BatchMovesReply, BatchMovesRequest, ChatReply, ChatRequest, MoveReply, MoveRequest,
    NewGameReply, NewGameRequest, PlayerColor, UndoReply,
};

fn fen_after(moves: &[&str]) -> String {
    let position = PositionStore::replay(&Chess::default(), moves.iter().copied()).unwrap();
    PositionStore::to_fen(&position)
}

fn move_request(notation: &str) -> MoveRequest {
    MoveRequest {
        notation: notation.to_string(),
        player_elo: 800,
        coaching_intensity: CoachingIntensity::Medium,
    }
}

fn batch_request(moves: &[&str]) -> BatchMovesRequest {
    BatchMovesRequest {
        moves: moves.iter().map(|m| m.to_string()).collect(),
        analyze_move: moves.len(),
        player_elo: 800,
        coaching_intensity: CoachingIntensity::Medium,
    }
}

// ============================================================================
// Offline gateway
// ============================================================================

#[tokio::test]
async fn test_offline_new_game() {
    let gateway = OfflineGateway::new();
    gateway.submit_move(move_request("e4")).await.unwrap();

    let reply = gateway
        .new_game(NewGameRequest {
            player_color: PlayerColor::Black,
        })
        .await
        .unwrap();

    assert_eq!(reply.message, "New game started. You are playing as black.");
    assert_eq!(reply.board_state.fen, START_FEN);
    assert!(reply.board_state.moves.is_empty());
    assert!(gateway.moves().is_empty());
}

#[tokio::test]
async fn test_offline_move_returns_canonical_san() {
    let gateway = OfflineGateway::new();

    let reply = gateway.submit_move(move_request("g1f3")).await.unwrap();

    assert_eq!(reply.san, "Nf3");
    assert_eq!(reply.board_state.fen, fen_after(&["Nf3"]));
    assert_eq!(reply.board_state.moves, vec!["Nf3"]);
    assert_eq!(reply.board_state.turn, PlayerColor::Black);
    assert_eq!(reply.game_phase, GamePhase::Opening);
    assert!(reply.coaching_feedback.starts_with("Nf3:"));
}

#[tokio::test]
async fn test_offline_rejects_illegal_move() {
    let gateway = OfflineGateway::new();

    let err = gateway.submit_move(move_request("e9")).await.unwrap_err();
    assert_eq!(err, GatewayError::Rejected("Invalid move: e9".to_string()));

    let err = gateway.submit_move(move_request("  ")).await.unwrap_err();
    assert_eq!(err, GatewayError::Rejected("No move provided".to_string()));
    assert_eq!(gateway.fen(), START_FEN);
}

#[tokio::test]
async fn test_offline_undo() {
    let gateway = OfflineGateway::new();

    let err = gateway.undo().await.unwrap_err();
    assert_eq!(err, GatewayError::Rejected("No moves to undo".to_string()));

    gateway.submit_move(move_request("d4")).await.unwrap();
    gateway.submit_move(move_request("d5")).await.unwrap();
    let reply = gateway.undo().await.unwrap();

    assert_eq!(reply.undone_move, "d5");
    assert_eq!(reply.message, "Undid move: d5");
    assert_eq!(reply.board_state.fen, fen_after(&["d4"]));
    assert_eq!(gateway.moves(), vec!["d4"]);
}

#[tokio::test]
async fn test_offline_batch_reports_feedback_for_analysed_move() {
    let gateway = OfflineGateway::new();

    let reply = gateway
        .batch_moves(batch_request(&["e4", "e5", "Nf3"]))
        .await
        .unwrap();

    assert_eq!(reply.moves_played, 3);
    assert_eq!(reply.board_state.fen, fen_after(&["e4", "e5", "Nf3"]));
    assert!(reply
        .coaching_feedback
        .as_deref()
        .is_some_and(|text| text.starts_with("Nf3:")));
}

#[tokio::test]
async fn test_offline_batch_is_all_or_nothing() {
    let gateway = OfflineGateway::new();
    gateway.submit_move(move_request("c4")).await.unwrap();

    let err = gateway
        .batch_moves(batch_request(&["e5", "Nc3", "Ke3"]))
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::Rejected("Invalid move: Ke3".to_string()));
    assert_eq!(gateway.moves(), vec!["c4"]);
    assert_eq!(gateway.fen(), fen_after(&["c4"]));

    let err = gateway.batch_moves(batch_request(&[])).await.unwrap_err();
    assert_eq!(err, GatewayError::Rejected("No moves provided".to_string()));
}

#[tokio::test]
async fn test_offline_chat() {
    let gateway = OfflineGateway::new();

    let err = gateway
        .chat(ChatRequest {
            question: String::new(),
            recent_coaching: String::new(),
            player_elo: 800,
        })
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Rejected("No question provided".to_string()));

    let reply = gateway
        .chat(ChatRequest {
            question: "What now?".to_string(),
            recent_coaching: String::new(),
            player_elo: 800,
        })
        .await
        .unwrap();
    assert!(reply.answer.contains("opening"));
}

// ============================================================================
// Reply decoding
// ============================================================================

#[test]
fn test_decode_move_reply_with_rejection_status() {
    let body = r#"{"success": false, "error": "Invalid move: Qh5. Error: illegal san"}"#;
    let err = decode_reply::<MoveReply>(body).unwrap_err();

    assert_eq!(
        err,
        GatewayError::Rejected("Invalid move: Qh5. Error: illegal san".to_string())
    );
}

#[test]
fn test_decode_batch_reply_with_null_feedback() {
    let body = format!(
        r#"{{"success": true, "moves_played": 2,
            "board_state": {{"fen": "{}", "turn": "white", "move_number": 2,
                             "moves": ["e4", "e5"], "is_check": false,
                             "is_checkmate": false, "is_stalemate": false,
                             "is_game_over": false}},
            "coaching_feedback": null}}"#,
        fen_after(&["e4", "e5"])
    );
    let reply: BatchMovesReply = decode_reply(&body).unwrap();

    assert_eq!(reply.moves_played, 2);
    assert!(reply.coaching_feedback.is_none());
}

#[test]
fn test_gateway_error_maps_to_game_error() {
    let limit = Duration::from_secs(3);

    assert_eq!(
        GameError::from(GatewayError::Rejected("nope".to_string())),
        GameError::ServerRejection("nope".to_string())
    );
    assert_eq!(
        GameError::from(GatewayError::Timeout(limit)),
        GameError::Timeout(limit)
    );
    assert!(matches!(
        GameError::from(GatewayError::Transport("reset".to_string())),
        GameError::TransportFailure(_)
    ));
}

// ============================================================================
// Driver
// ============================================================================

/// Gateway whose every call hangs forever
struct SilentGateway;

#[async_trait]
impl CoachingGateway for SilentGateway {
    async fn new_game(&self, _: NewGameRequest) -> GatewayResult<NewGameReply> {
        std::future::pending().await
    }

    async fn submit_move(&self, _: MoveRequest) -> GatewayResult<MoveReply> {
        std::future::pending().await
    }

    async fn batch_moves(&self, _: BatchMovesRequest) -> GatewayResult<BatchMovesReply> {
        std::future::pending().await
    }

    async fn undo(&self) -> GatewayResult<UndoReply> {
        std::future::pending().await
    }

    async fn chat(&self, _: ChatRequest) -> GatewayResult<ChatReply> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_run_call_times_out() {
    let call = GatewayCall {
        ticket: Ticket::Game(7),
        request: GatewayRequest::Undo,
    };

    let (ticket, result) = run_call(Arc::new(SilentGateway), call, Duration::from_millis(20)).await;

    assert_eq!(ticket, Ticket::Game(7));
    assert_eq!(result, Err(GatewayError::Timeout(Duration::from_millis(20))));
}

/// Gateway that hangs on game calls and crashes on chat
struct CrashingChatGateway;

#[async_trait]
impl CoachingGateway for CrashingChatGateway {
    async fn new_game(&self, _: NewGameRequest) -> GatewayResult<NewGameReply> {
        std::future::pending().await
    }

    async fn submit_move(&self, _: MoveRequest) -> GatewayResult<MoveReply> {
        std::future::pending().await
    }

    async fn batch_moves(&self, _: BatchMovesRequest) -> GatewayResult<BatchMovesReply> {
        std::future::pending().await
    }

    async fn undo(&self) -> GatewayResult<UndoReply> {
        std::future::pending().await
    }

    async fn chat(&self, _: ChatRequest) -> GatewayResult<ChatReply> {
        panic!("chat handler crashed")
    }
}

#[tokio::test]
async fn test_crashed_chat_task_fails_only_the_chat() {
    //! A dead chat task must resolve the chat ticket, never the move that
    //! is in flight next to it.
    let mut driver = SessionDriver::new(
        GameSession::default(),
        Arc::new(CrashingChatGateway),
        Duration::from_secs(5),
    );
    let mut calls = InFlightCalls::new();

    let sent = driver.dispatch_detached(
        InputEvent::NotationSubmitted("e4".to_string()),
        &mut calls,
    );
    assert_eq!(sent, Ok(None));
    let asked = driver.dispatch_detached(
        InputEvent::ChatSubmitted("Why e4?".to_string()),
        &mut calls,
    );
    assert_eq!(asked, Ok(None));
    assert_eq!(calls.len(), 2);

    let (ticket, result) = calls.next().await.unwrap();
    assert!(matches!(ticket, Ticket::Chat(_)));
    assert!(matches!(result, Err(GatewayError::Transport(_))));

    let err = driver.complete((ticket, result)).unwrap_err();
    assert!(matches!(err, GameError::TransportFailure(_)));
    assert!(!driver.session().chat().is_waiting());
    assert!(driver.session().is_pending());
    assert_eq!(calls.len(), 1);

    // The chat slot is usable again
    let again = driver.dispatch_detached(
        InputEvent::ChatSubmitted("And d4?".to_string()),
        &mut calls,
    );
    assert_eq!(again, Ok(None));
    calls.abort_all();
}

#[tokio::test]
async fn test_immediate_game_against_offline_coach() {
    let gateway = Arc::new(OfflineGateway::new());
    let mut driver = SessionDriver::new(
        GameSession::default(),
        gateway.clone(),
        Duration::from_secs(5),
    );

    driver.dispatch(InputEvent::NewGameRequested).await.unwrap();
    for m in ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"] {
        let outcome = driver
            .dispatch(InputEvent::NotationSubmitted(m.to_string()))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Move(MoveOutcome::Reconciled { .. })));
    }

    let snapshot = driver.session().snapshot();
    assert_eq!(snapshot.fen, gateway.fen());
    assert!(snapshot.status.is_game_over());
    assert_eq!(snapshot.highlight.last_move_notation.as_deref(), Some("Qxf7#"));

    let outcome = driver.dispatch(InputEvent::UndoRequested).await.unwrap();
    assert!(matches!(outcome, Outcome::Undone(_)));
    assert_eq!(driver.session().position().fen(), gateway.fen());
    assert!(!driver.session().snapshot().status.is_game_over());
}

#[tokio::test]
async fn test_batched_game_against_offline_coach() {
    let gateway = Arc::new(OfflineGateway::new());
    let session = GameSession::new(CoachingParams::default(), SessionMode::Batched);
    let mut driver = SessionDriver::new(session, gateway.clone(), Duration::from_secs(5));

    for m in ["d4", "d5", "c4"] {
        driver
            .dispatch(InputEvent::NotationSubmitted(m.to_string()))
            .await
            .unwrap();
    }
    assert!(gateway.moves().is_empty());

    driver.dispatch(InputEvent::UndoRequested).await.unwrap();
    driver
        .dispatch(InputEvent::NotationSubmitted("Nf3".to_string()))
        .await
        .unwrap();

    let outcome = driver.dispatch(InputEvent::BatchSubmitRequested).await.unwrap();
    assert_eq!(outcome, Outcome::BatchCoached { moves: 3 });
    assert_eq!(gateway.moves(), vec!["d4", "d5", "Nf3"]);
    assert_eq!(driver.session().position().fen(), gateway.fen());
    assert!(driver.session().buffer().is_empty());
}
