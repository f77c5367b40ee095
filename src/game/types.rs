//! Type definitions for the move-interaction core
//!
//! Squares, colours and positions come straight from `shakmaty`; this module
//! adds the client-side vocabulary layered on top of them.

use std::fmt;

use shakmaty::Square;

pub use shared::protocol::{CoachingIntensity, GamePhase, PlayerColor};

/// A move the rules engine accepted against a concrete position
///
/// `from`/`to` are resolved once, at application time, and cached so the
/// presentation layer can highlight the move without re-parsing notation.
/// Castling is recorded with the king's squares (`e1` → `g1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayedMove {
    /// Canonical SAN, including `+`/`#` suffixes
    pub notation: String,
    pub from: Square,
    pub to: Square,
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

/// Raw move input before the rules engine has looked at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    /// Typed SAN (`Nf3`) or UCI (`g1f3`)
    Notation(String),
    /// Completed square-click selection
    Squares { from: Square, to: Square },
}

impl MoveInput {
    pub fn notation(text: impl Into<String>) -> Self {
        MoveInput::Notation(text.into())
    }

    /// Best-effort label for error messages
    pub fn label(&self) -> String {
        match self {
            MoveInput::Notation(text) => text.trim().to_string(),
            MoveInput::Squares { from, to } => format!("{from}{to}"),
        }
    }
}

impl From<&str> for MoveInput {
    fn from(text: &str) -> Self {
        MoveInput::Notation(text.to_string())
    }
}

/// Whether moves are coached one at a time or collected into a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionMode {
    /// Every move is sent to the gateway as soon as it is made
    #[default]
    Immediate,
    /// Moves are applied locally until coaching is explicitly requested
    Batched,
}

impl SessionMode {
    pub fn toggled(self) -> Self {
        match self {
            SessionMode::Immediate => SessionMode::Batched,
            SessionMode::Batched => SessionMode::Immediate,
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Immediate => f.write_str("immediate"),
            SessionMode::Batched => f.write_str("batched"),
        }
    }
}

/// Rating and intensity sent along with every coaching request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoachingParams {
    pub player_rating: u32,
    pub intensity: CoachingIntensity,
    pub player_color: PlayerColor,
}

impl Default for CoachingParams {
    fn default() -> Self {
        Self {
            player_rating: 800,
            intensity: CoachingIntensity::Medium,
            player_color: PlayerColor::White,
        }
    }
}

/// Convert between the wire colour and the rules engine's colour
pub fn player_color(color: shakmaty::Color) -> PlayerColor {
    match color {
        shakmaty::Color::White => PlayerColor::White,
        shakmaty::Color::Black => PlayerColor::Black,
    }
}
