//! Position store - single source of truth for the board
//!
//! Wraps a `shakmaty::Chess` position and the rules-engine queries the rest
//! of the client needs (side to move, piece lookup, legal destinations,
//! move application).
//!
//! # Architecture
//!
//! Queries are associated functions over an explicit `&Chess` so they stay
//! pure: the selection state machine, the move buffer replay and the
//! offline gateway all call them against positions that are not the
//! current one. The store instance itself only owns:
//!
//! - the current position, replaced wholesale on every accepted change
//! - a revision counter bumped on each replacement, which the presentation
//!   layer uses to force a full board remount
//!
//! # Move input
//!
//! Typed input is parsed as SAN first (`Nf3`, `exd5`, `O-O`, `e8=Q+`) and
//! falls back to UCI coordinates (`g1f3`). Square pairs coming from clicks
//! are matched against the legal move list, auto-promoting to a queen.

use std::collections::BTreeSet;

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position, Role, Square};
use tracing::debug;

use crate::game::error::{GameError, GameResult};
use crate::game::types::{GamePhase, MoveInput, PlayedMove};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// End-of-game information derived from the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }
}

/// Owner of the current position
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    position: Chess,
    revision: u64,
}

impl PositionStore {
    /// Store holding the standard starting position at revision 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position
    pub fn current(&self) -> &Chess {
        &self.position
    }

    /// FEN of the current position
    pub fn fen(&self) -> String {
        Self::to_fen(&self.position)
    }

    /// Monotonic token, bumped on every replacement
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Atomically swap in a new position
    pub fn replace(&mut self, position: Chess) {
        self.position = position;
        self.revision += 1;
        debug!(
            "[POSITION] Replaced position (revision {}): {}",
            self.revision,
            self.fen()
        );
    }

    /// Parse and adopt a FEN; the current position is untouched on failure
    pub fn replace_fen(&mut self, fen: &str) -> GameResult<()> {
        let position = Self::load(fen)?;
        self.replace(position);
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        Self::status_of(&self.position)
    }

    // ========================================================================
    // Pure rules-engine queries
    // ========================================================================

    /// Parse a FEN string into a legal position
    pub fn load(fen: &str) -> GameResult<Chess> {
        let parsed = Fen::from_ascii(fen.trim().as_bytes())
            .map_err(|e| GameError::InvalidPosition(format!("{fen}: {e}")))?;
        parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| GameError::InvalidPosition(format!("{fen}: {e}")))
    }

    pub fn to_fen(position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }

    pub fn turn(position: &Chess) -> Color {
        position.turn()
    }

    pub fn piece_at(position: &Chess, square: Square) -> Option<Piece> {
        position.board().piece_at(square)
    }

    /// Whether `square` holds a piece of the side to move
    pub fn is_own_piece(position: &Chess, square: Square) -> bool {
        Self::piece_at(position, square).is_some_and(|piece| piece.color == position.turn())
    }

    /// Squares the piece on `square` may legally move to
    ///
    /// Empty for empty squares and for pieces of the side not to move.
    pub fn legal_destinations(position: &Chess, square: Square) -> BTreeSet<Square> {
        if !Self::is_own_piece(position, square) {
            return BTreeSet::new();
        }

        position
            .legal_moves()
            .iter()
            .filter_map(move_squares)
            .filter(|(from, _)| *from == square)
            .map(|(_, to)| to)
            .collect()
    }

    /// Apply `input` to `position`, returning the successor and the resolved move
    ///
    /// Never a silent no-op: anything the rules engine does not accept is
    /// reported as [`GameError::IllegalMove`] and `position` is not touched.
    pub fn apply_move(position: &Chess, input: &MoveInput) -> GameResult<(Chess, PlayedMove)> {
        let illegal = || GameError::IllegalMove {
            notation: input.label(),
        };

        let chosen = match input {
            MoveInput::Notation(text) => Self::parse_notation(position, text),
            MoveInput::Squares { from, to } => Self::find_move(position, *from, *to),
        }
        .ok_or_else(illegal)?;

        let (from, to) = move_squares(&chosen).ok_or_else(illegal)?;
        let san = San::from_move(position, chosen.clone());
        let next = position.clone().play(chosen).map_err(|_| illegal())?;

        let suffix = if next.is_checkmate() {
            "#"
        } else if next.is_check() {
            "+"
        } else {
            ""
        };

        Ok((
            next,
            PlayedMove {
                notation: format!("{san}{suffix}"),
                from,
                to,
            },
        ))
    }

    /// Replay a sequence of SAN moves from `start`
    pub fn replay<'a>(
        start: &Chess,
        notations: impl IntoIterator<Item = &'a str>,
    ) -> GameResult<Chess> {
        notations
            .into_iter()
            .try_fold(start.clone(), |position, notation| {
                Self::apply_move(&position, &MoveInput::notation(notation)).map(|(next, _)| next)
            })
    }

    pub fn status_of(position: &Chess) -> GameStatus {
        if position.is_checkmate() {
            GameStatus::Checkmate
        } else if position.is_stalemate() {
            GameStatus::Stalemate
        } else if position.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if position.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// Opening for the first 10 plies, endgame at 12 or fewer pieces
    pub fn phase_of(position: &Chess, plies_played: usize) -> GamePhase {
        if plies_played < 10 {
            GamePhase::Opening
        } else if position.board().occupied().count() <= 12 {
            GamePhase::Endgame
        } else {
            GamePhase::Middlegame
        }
    }

    fn parse_notation(position: &Chess, text: &str) -> Option<Move> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(san) = text.parse::<SanPlus>() {
            if let Ok(m) = san.san.to_move(position) {
                return Some(m);
            }
        }

        text.parse::<UciMove>()
            .ok()
            .and_then(|uci| uci.to_move(position).ok())
    }

    fn find_move(position: &Chess, from: Square, to: Square) -> Option<Move> {
        let candidates: Vec<Move> = position
            .legal_moves()
            .into_iter()
            .filter(|m| move_squares(m) == Some((from, to)))
            .collect();

        candidates
            .iter()
            .find(|m| m.promotion() == Some(Role::Queen))
            .or_else(|| candidates.first())
            .cloned()
    }
}

/// From/to squares as a user would click them
///
/// Castling maps to the king's start and destination squares rather than
/// the king-takes-rook encoding used internally by the rules engine.
pub fn move_squares(m: &Move) -> Option<(Square, Square)> {
    match m.to_uci(CastlingMode::Standard) {
        UciMove::Normal { from, to, .. } => Some((from, to)),
        _ => None,
    }
}
