//! Inbound events consumed by [`GameSession::handle`](crate::game::GameSession::handle)

use shakmaty::Square;

use crate::game::types::CoachingIntensity;

/// Everything the presentation layer can ask the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A board square was clicked
    SquareClicked(Square),
    /// Typed move, SAN or UCI
    NotationSubmitted(String),
    UndoRequested,
    /// Send the buffered moves for coaching
    BatchSubmitRequested,
    ModeToggled,
    /// Answer to a pending "discard unsent moves?" prompt
    DiscardConfirmed(bool),
    NewGameRequested,
    /// Follow-up question to the coach
    ChatSubmitted(String),
    RatingChanged(u32),
    IntensityChanged(CoachingIntensity),
}

impl InputEvent {
    /// Whether this event answers the discard prompt
    pub fn is_confirmation(&self) -> bool {
        matches!(self, InputEvent::DiscardConfirmed(_))
    }
}
