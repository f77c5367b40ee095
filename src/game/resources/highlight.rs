//! Highlight state handed to the presentation layer
//!
//! Derived, never authoritative: built from the last applied move and the
//! current selection each time a snapshot is taken.

use std::collections::BTreeSet;

use shakmaty::Square;

use crate::game::resources::selection::Selection;
use crate::game::types::PlayedMove;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub last_move_from: Option<Square>,
    pub last_move_to: Option<Square>,
    pub last_move_notation: Option<String>,
    pub selected_square: Option<Square>,
    pub legal_destinations: BTreeSet<Square>,
}

impl HighlightState {
    pub fn derive(last_move: Option<&PlayedMove>, selection: &Selection) -> Self {
        Self {
            last_move_from: last_move.map(|m| m.from),
            last_move_to: last_move.map(|m| m.to),
            last_move_notation: last_move.map(|m| m.notation.clone()),
            selected_square: selection.selected_square(),
            legal_destinations: selection.destinations(),
        }
    }

    /// Whether `square` should be drawn as part of the last move
    pub fn is_last_move(&self, square: Square) -> bool {
        self.last_move_from == Some(square) || self.last_move_to == Some(square)
    }
}
