//! Selection state machine for square clicks
//!
//! Turns raw square clicks into either a selected piece with its legal
//! destinations or a completed from/to pair. It never talks to the
//! network; completed pairs are handed to the move dispatcher.

use std::collections::BTreeSet;

use shakmaty::{Chess, Square};
use tracing::debug;

use crate::game::resources::position::PositionStore;

/// Currently selected piece, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        square: Square,
        destinations: BTreeSet<Square>,
    },
}

/// What a single click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    /// Nothing was selected and nothing is now
    Ignored,
    /// A piece of the side to move is now selected (possibly re-selected)
    Selected(Square),
    /// The previous selection was dropped
    Deselected,
    /// The click finished a move; the machine is back to idle
    Completed { from: Square, to: Square },
}

impl Selection {
    /// Feed one click against the current position
    pub fn click(&mut self, position: &Chess, square: Square) -> ClickResult {
        if let Selection::Selected {
            square: from,
            destinations,
        } = self
        {
            if destinations.contains(&square) {
                let from = *from;
                *self = Selection::Idle;
                debug!("[SELECTION] Completed {}{}", from, square);
                return ClickResult::Completed { from, to: square };
            }
        }

        if PositionStore::is_own_piece(position, square) {
            *self = Selection::Selected {
                square,
                destinations: PositionStore::legal_destinations(position, square),
            };
            debug!("[SELECTION] Selected {}", square);
            return ClickResult::Selected(square);
        }

        if self.is_selected() {
            self.clear();
            ClickResult::Deselected
        } else {
            ClickResult::Ignored
        }
    }

    /// Whether clicking `square` right now would complete a move
    pub fn completes_move(&self, square: Square) -> bool {
        matches!(self, Selection::Selected { destinations, .. } if destinations.contains(&square))
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected { .. })
    }

    pub fn selected_square(&self) -> Option<Square> {
        match self {
            Selection::Selected { square, .. } => Some(*square),
            Selection::Idle => None,
        }
    }

    pub fn destinations(&self) -> BTreeSet<Square> {
        match self {
            Selection::Selected { destinations, .. } => destinations.clone(),
            Selection::Idle => BTreeSet::new(),
        }
    }
}
