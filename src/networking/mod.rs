//! Remote coaching gateway
//!
//! The session never performs I/O itself. It hands out [`GatewayRequest`]s
//! and takes [`GatewayResponse`]s back; everything in between lives here.
//!
//! # Implementations
//!
//! - [`HttpGateway`] - JSON over HTTP against the coaching backend
//! - [`OfflineGateway`] - in-process board with canned feedback, for play
//!   without a backend and for tests
//!
//! # Driving a session
//!
//! [`SessionDriver`] owns a session and a gateway and runs each round trip
//! under the configured timeout.

pub mod client;
pub mod driver;
pub mod offline;

use std::time::Duration;

use async_trait::async_trait;
use shared::protocol::{
    BatchMovesReply, BatchMovesRequest, ChatReply, ChatRequest, MoveReply, MoveRequest,
    NewGameReply, NewGameRequest, UndoReply,
};
use thiserror::Error;

use crate::game::GameError;

pub use client::{HttpGateway, DEFAULT_GATEWAY_URL};
pub use driver::{run_call, InFlightCalls, SessionDriver, DEFAULT_REQUEST_TIMEOUT};
pub use offline::OfflineGateway;

/// Ways a gateway round trip can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway answered `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Connection, HTTP or decoding failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No answer within the configured bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for GameError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(reason) => GameError::ServerRejection(reason),
            GatewayError::Transport(detail) => GameError::TransportFailure(detail),
            GatewayError::Timeout(limit) => GameError::Timeout(limit),
        }
    }
}

/// Operations the coaching backend exposes
#[async_trait]
pub trait CoachingGateway: Send + Sync {
    async fn new_game(&self, request: NewGameRequest) -> GatewayResult<NewGameReply>;

    async fn submit_move(&self, request: MoveRequest) -> GatewayResult<MoveReply>;

    async fn batch_moves(&self, request: BatchMovesRequest) -> GatewayResult<BatchMovesReply>;

    async fn undo(&self) -> GatewayResult<UndoReply>;

    async fn chat(&self, request: ChatRequest) -> GatewayResult<ChatReply>;
}

/// A request the session wants sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayRequest {
    NewGame(NewGameRequest),
    Move(MoveRequest),
    BatchMoves(BatchMovesRequest),
    Undo,
    Chat(ChatRequest),
}

impl GatewayRequest {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayRequest::NewGame(_) => "new-game",
            GatewayRequest::Move(_) => "move",
            GatewayRequest::BatchMoves(_) => "batch-moves",
            GatewayRequest::Undo => "undo",
            GatewayRequest::Chat(_) => "chat",
        }
    }
}

/// Accepted reply, tagged with the request it answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    NewGame(NewGameReply),
    Move(MoveReply),
    BatchMoves(BatchMovesReply),
    Undo(UndoReply),
    Chat(ChatReply),
}

/// Route a request to the matching gateway operation
pub async fn perform(
    gateway: &dyn CoachingGateway,
    request: GatewayRequest,
) -> GatewayResult<GatewayResponse> {
    match request {
        GatewayRequest::NewGame(req) => gateway.new_game(req).await.map(GatewayResponse::NewGame),
        GatewayRequest::Move(req) => gateway.submit_move(req).await.map(GatewayResponse::Move),
        GatewayRequest::BatchMoves(req) => gateway
            .batch_moves(req)
            .await
            .map(GatewayResponse::BatchMoves),
        GatewayRequest::Undo => gateway.undo().await.map(GatewayResponse::Undo),
        GatewayRequest::Chat(req) => gateway.chat(req).await.map(GatewayResponse::Chat),
    }
}
