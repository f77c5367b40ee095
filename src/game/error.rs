//! Error types for game module
//!
//! Every variant is recoverable: a failed operation leaves the position,
//! selection and move buffer exactly as they were before it started.

use std::time::Duration;

/// Hint appended to illegal-move messages
pub const NOTATION_HINT: &str = "Tip: For captures, use format like 'exd5' or 'Nxe5'";

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The rules engine rejected a move against the current position
    #[error("Invalid move: {notation}")]
    IllegalMove { notation: String },

    /// The coaching gateway answered with `success: false`
    #[error("{0}")]
    ServerRejection(String),

    /// The coaching gateway could not be reached or sent garbage back
    #[error("Communication with the coach failed: {0}")]
    TransportFailure(String),

    /// The in-flight request did not resolve in time
    #[error("The coach did not respond within {0:?}")]
    Timeout(Duration),

    /// Coaching requested with no buffered moves
    #[error("No moves to analyze. Make some moves first!")]
    EmptyBuffer,

    /// Another game-mutating request is still in flight
    #[error("Still waiting for the coach to respond")]
    Busy,

    /// The previous follow-up question has not been answered yet
    #[error("Still waiting for the coach to answer your last question")]
    ChatBusy,

    /// A FEN string could not be turned into a legal position
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

impl GameError {
    /// Text shown to the player for this failure
    pub fn user_message(&self) -> String {
        match self {
            GameError::IllegalMove { .. } => format!("{self}\n\n{NOTATION_HINT}"),
            GameError::ServerRejection(reason) => reason.clone(),
            GameError::TransportFailure(_) => {
                "Error talking to the coach. Make sure the gateway is running, then try again."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether this failure belongs in the coaching feedback panel
    ///
    /// Chat refusals stay out of it so the last coaching text survives as
    /// context for the next question.
    pub fn replaces_feedback(&self) -> bool {
        !matches!(self, GameError::ChatBusy)
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
