//! Plain-text presentation of a session
//!
//! Renders the board and status lines for the console. Reads snapshots
//! only; nothing here mutates the session.
//!
//! Board cells are three characters wide:
//!
//! - `[P]` last move from/to square
//! - `(P)` selected piece
//! - ` * ` / `*p*` legal destination, empty or capture

use std::fmt::Write;

use shakmaty::{Chess, File, Position, Rank, Square};

use crate::game::resources::{ChatLog, ChatRole, GameStatus, HighlightState};
use crate::game::{MoveOutcome, Outcome, SessionSnapshot, UndoOutcome};

/// Draw `position` from White's side with the highlight overlaid
pub fn render_board(position: &Chess, highlight: &HighlightState) -> String {
    let board = position.board();
    let mut out = String::new();

    for rank in Rank::ALL.iter().rev() {
        let _ = write!(out, "{} ", rank.char());
        for file in File::ALL {
            let square = Square::from_coords(file, *rank);
            let glyph = board.piece_at(square).map_or('.', |piece| piece.char());

            let cell = if highlight.selected_square == Some(square) {
                format!("({glyph})")
            } else if highlight.legal_destinations.contains(&square) {
                if glyph == '.' {
                    " * ".to_string()
                } else {
                    format!("*{glyph}*")
                }
            } else if highlight.is_last_move(square) {
                format!("[{glyph}]")
            } else {
                format!(" {glyph} ")
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out.push_str("   a  b  c  d  e  f  g  h\n");
    out
}

/// One-line summary under the board
pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let mut line = format!(
        "{:?} to move | {:?} | {} mode",
        snapshot.turn, snapshot.phase, snapshot.mode
    );

    if snapshot.buffered > 0 {
        let _ = write!(line, " | {} unsent", snapshot.buffered);
    }
    if let Some(last) = &snapshot.highlight.last_move_notation {
        let _ = write!(line, " | last: {last}");
    }
    match snapshot.status {
        GameStatus::Ongoing => {}
        GameStatus::Check => line.push_str(" | check"),
        GameStatus::Checkmate => line.push_str(" | checkmate"),
        GameStatus::Stalemate => line.push_str(" | stalemate"),
        GameStatus::InsufficientMaterial => line.push_str(" | draw (insufficient material)"),
    }
    if snapshot.pending {
        line.push_str(" | waiting for coach");
    }
    line
}

/// Short acknowledgement for a finished operation, if worth printing
pub fn describe_outcome(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Move(MoveOutcome::LocalOnly(played)) => Some(format!("Played {played} (not sent yet)")),
        Outcome::Move(MoveOutcome::Reconciled { played, .. }) => Some(format!("Played {played}")),
        Outcome::Undone(UndoOutcome::Local { undone }) => Some(format!("Took back {undone}")),
        Outcome::Undone(UndoOutcome::Reconciled { undone, .. }) => Some(format!("Took back {undone}")),
        Outcome::BatchCoached { moves } => Some(format!("Coach reviewed {moves} move(s)")),
        Outcome::ModeChanged(mode) => Some(format!("Now in {mode} mode")),
        Outcome::ConfirmationRequired { unsaved } => Some(format!(
            "Discard {unsaved} unsent move(s) and switch modes? (yes/no)"
        )),
        Outcome::SettingsChanged(params) => Some(format!(
            "Rating {} | intensity {:?}",
            params.player_rating, params.intensity
        )),
        Outcome::GameStarted(color) => Some(format!("Playing as {color:?}")),
        Outcome::Selection(_)
        | Outcome::DiscardDeclined
        | Outcome::ChatAnswered
        | Outcome::Ignored => None,
    }
}

pub fn render_transcript(chat: &ChatLog) -> String {
    if chat.entries().is_empty() {
        return "No questions yet. Try: ask why is e4 good?\n".to_string();
    }

    let mut out = String::new();
    for entry in chat.entries() {
        let who = match entry.role {
            ChatRole::User => "you",
            ChatRole::Coach => "coach",
            ChatRole::Error => "error",
        };
        let _ = writeln!(out, "{who:>5}: {}", entry.content);
    }
    out
}
