//! JSON messages exchanged with the coaching gateway.
//!
//! Field names follow the gateway's wire format (`player_elo`,
//! `analyze_move`, `board_state`, ...). Every reply is either an accepted
//! body or a rejection carrying the server's error text, see [`Reply`].

use serde::{Deserialize, Serialize};

/// Side the human plays in a new game
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[default]
    White,
    Black,
}

/// How detailed the coaching feedback should be
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoachingIntensity {
    Low,
    #[default]
    Medium,
    High,
}

/// Coarse stage of the game as reported by the gateway
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Opening,
    Middlegame,
    Endgame,
}

/// Authoritative board snapshot attached to most replies
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct BoardState {
    pub fen: String,
    #[serde(default)]
    pub turn: PlayerColor,
    #[serde(default)]
    pub move_number: usize,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_stalemate: bool,
    #[serde(default)]
    pub is_game_over: bool,
}

// ============================================================================
// Client → Gateway
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewGameRequest {
    pub player_color: PlayerColor,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub notation: String,
    pub player_elo: u32,
    pub coaching_intensity: CoachingIntensity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchMovesRequest {
    pub moves: Vec<String>,
    /// 1-based index of the move that receives detailed feedback
    pub analyze_move: usize,
    pub player_elo: u32,
    pub coaching_intensity: CoachingIntensity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub recent_coaching: String,
    pub player_elo: u32,
}

// ============================================================================
// Gateway → Client
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewGameReply {
    #[serde(default)]
    pub message: String,
    pub board_state: BoardState,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MoveReply {
    /// Canonical SAN of the move the gateway played
    #[serde(rename = "move")]
    pub san: String,
    pub board_state: BoardState,
    #[serde(default)]
    pub coaching_feedback: String,
    #[serde(default)]
    pub game_phase: GamePhase,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_game_over: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchMovesReply {
    #[serde(default)]
    pub moves_played: usize,
    pub board_state: BoardState,
    #[serde(default)]
    pub coaching_feedback: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UndoReply {
    #[serde(default)]
    pub message: String,
    pub undone_move: String,
    pub board_state: BoardState,
    #[serde(default)]
    pub game_phase: GamePhase,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
}

/// `{"success": false, "error": "..."}` body
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    #[serde(default)]
    pub success: bool,
    pub error: String,
}

/// Either the accepted body of a reply or the gateway's rejection.
///
/// Rejections are tried first: accepted bodies never carry an `error` field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reply<T> {
    Rejected(Rejection),
    Accepted(T),
}

impl<T> Reply<T> {
    pub fn rejected(error: impl Into<String>) -> Self {
        Reply::Rejected(Rejection {
            success: false,
            error: error.into(),
        })
    }

    /// Accepted body, or the server's error text
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Reply::Accepted(body) => Ok(body),
            Reply::Rejected(rejection) => Err(rejection.error),
        }
    }
}

/// Wraps an accepted body with the `success: true` flag the gateway emits
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Accepted<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Accepted<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
