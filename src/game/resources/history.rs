//! Move history buffer for batched coaching
//!
//! Ordered record of moves applied locally but not yet sent to the coaching
//! gateway. Two jobs:
//!
//! - **Batch submission**: the notations, in application order, become the
//!   body of a single coaching request
//! - **Local undo**: the position before the first buffered move is kept,
//!   so dropping the last entry is a replay of the remaining ones
//!
//! The buffer is empty outside batched mode and after a successful batch
//! submission, an undo back to empty, a confirmed mode switch or a new game.

use shakmaty::Chess;

use crate::game::error::GameResult;
use crate::game::resources::position::PositionStore;
use crate::game::types::PlayedMove;

/// Locally applied moves pending submission
#[derive(Debug, Clone, Default)]
pub struct MoveHistoryBuffer {
    /// Position before the first buffered move
    base: Option<Chess>,
    moves: Vec<PlayedMove>,
}

impl MoveHistoryBuffer {
    /// Append a move that was applied on top of `before`
    ///
    /// `before` is only remembered for the first move of a batch.
    pub fn push(&mut self, before: &Chess, record: PlayedMove) {
        if self.moves.is_empty() {
            self.base = Some(before.clone());
        }
        self.moves.push(record);
    }

    /// Drop the most recent move
    pub fn pop(&mut self) -> Option<PlayedMove> {
        let popped = self.moves.pop();
        if self.moves.is_empty() {
            self.base = None;
        }
        popped
    }

    pub fn last_move(&self) -> Option<&PlayedMove> {
        self.moves.last()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.base = None;
    }

    /// Position the batch started from
    pub fn base(&self) -> Option<&Chess> {
        self.base.as_ref()
    }

    /// SAN of every buffered move, oldest first
    pub fn notations(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.notation.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayedMove> {
        self.moves.iter()
    }

    /// Position after every buffered move except the last
    ///
    /// Returns `None` when the buffer is empty.
    pub fn replay_without_last(&self) -> Option<GameResult<Chess>> {
        let base = self.base.as_ref()?;
        let keep = self.moves.len().checked_sub(1)?;
        Some(PositionStore::replay(
            base,
            self.moves[..keep].iter().map(|m| m.notation.as_str()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::MoveInput;

    /// Apply `moves` from the start, buffering each one
    fn buffered(moves: &[&str]) -> (MoveHistoryBuffer, Chess) {
        let mut buffer = MoveHistoryBuffer::default();
        let mut position = Chess::default();
        for notation in moves {
            let (next, played) =
                PositionStore::apply_move(&position, &MoveInput::notation(*notation)).unwrap();
            buffer.push(&position, played);
            position = next;
        }
        (buffer, position)
    }

    #[test]
    fn test_buffer_default() {
        //! Verifies the buffer starts empty with no base position
        let buffer = MoveHistoryBuffer::default();

        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.last_move().is_none());
        assert!(buffer.base().is_none());
        assert!(buffer.replay_without_last().is_none());
    }

    #[test]
    fn test_notations_keep_application_order() {
        let (buffer, _) = buffered(&["e4", "e5", "Nf3"]);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.notations(), vec!["e4", "e5", "Nf3"]);
        assert_eq!(buffer.last_move().map(|m| m.notation.as_str()), Some("Nf3"));
    }

    #[test]
    fn test_base_is_position_before_first_move() {
        let start = PositionStore::replay(&Chess::default(), ["d4", "d5"]).unwrap();
        let mut buffer = MoveHistoryBuffer::default();

        let (next, played) = PositionStore::apply_move(&start, &MoveInput::notation("c4")).unwrap();
        buffer.push(&start, played);
        let (_, played) = PositionStore::apply_move(&next, &MoveInput::notation("e6")).unwrap();
        buffer.push(&next, played);

        assert_eq!(
            buffer.base().map(PositionStore::to_fen),
            Some(PositionStore::to_fen(&start))
        );
    }

    #[test]
    fn test_replay_without_last() {
        let (buffer, _) = buffered(&["e4", "e5", "Nf3"]);
        let (_, expected) = buffered(&["e4", "e5"]);

        let replayed = buffer.replay_without_last().unwrap().unwrap();
        assert_eq!(PositionStore::to_fen(&replayed), PositionStore::to_fen(&expected));
    }

    #[test]
    fn test_pop_to_empty_forgets_base() {
        let (mut buffer, _) = buffered(&["e4"]);

        let popped = buffer.pop().unwrap();
        assert_eq!(popped.notation, "e4");
        assert!(buffer.is_empty());
        assert!(buffer.base().is_none());
        assert!(buffer.pop().is_none());
    }

    #[test]
    fn test_clear_removes_all_moves() {
        let (mut buffer, _) = buffered(&["e4", "c5", "Nf3", "d6", "d4"]);
        assert_eq!(buffer.len(), 5);

        buffer.clear();

        assert!(buffer.is_empty());
        assert!(buffer.base().is_none());
        assert_eq!(buffer.iter().count(), 0);
    }
}
