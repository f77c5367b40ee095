//! Console command parser
//!
//! One line of input becomes one [`ConsoleCommand`]. Anything that is not a
//! known keyword is treated as a typed move and left for the rules engine
//! to accept or reject.

use shakmaty::Square;
use thiserror::Error;

use crate::core::parse_intensity;
use crate::game::InputEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forward to the game session
    Event(InputEvent),
    /// Redraw the board
    Board,
    /// Print the chat transcript
    Transcript,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Nothing to do")]
    Empty,
    #[error("'{0}' is not a square (expected a1..h8)")]
    BadSquare(String),
    #[error("'{0}' is not a rating")]
    BadRating(String),
    #[error("'{0}' is not an intensity (low, medium, high)")]
    BadIntensity(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
Commands:
  <move>            play a move in SAN (Nf3, exd5, O-O) or UCI (g1f3)
  click <square>    click a square (select, reselect or complete a move)
  undo              take back the last move
  coach             request coaching for the buffered moves
  mode              switch between single-move and multi-move coaching
  yes / no          answer a discard prompt
  new               start a new game
  ask <question>    ask the coach a follow-up question
  chat              show the conversation with the coach
  rating <n>        set your rating
  intensity <lvl>   set coaching intensity (low, medium, high)
  board             redraw the board
  help              show this help
  quit              leave";

/// Parse one console line
pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let event = match keyword.to_ascii_lowercase().as_str() {
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        "board" | "show" => return Ok(ConsoleCommand::Board),
        "chat" => return Ok(ConsoleCommand::Transcript),
        "click" => InputEvent::SquareClicked(parse_square(required("click", rest)?)?),
        "undo" => InputEvent::UndoRequested,
        "coach" | "submit" => InputEvent::BatchSubmitRequested,
        "mode" | "toggle" => InputEvent::ModeToggled,
        "yes" | "y" => InputEvent::DiscardConfirmed(true),
        "no" | "n" => InputEvent::DiscardConfirmed(false),
        "new" => InputEvent::NewGameRequested,
        "ask" => InputEvent::ChatSubmitted(required("ask", rest)?.to_string()),
        "rating" => {
            let value = required("rating", rest)?;
            let rating = value
                .parse::<u32>()
                .map_err(|_| CommandError::BadRating(value.to_string()))?;
            InputEvent::RatingChanged(rating)
        }
        "intensity" => {
            let value = required("intensity", rest)?;
            let intensity =
                parse_intensity(value).ok_or_else(|| CommandError::BadIntensity(value.to_string()))?;
            InputEvent::IntensityChanged(intensity)
        }
        _ => InputEvent::NotationSubmitted(line.to_string()),
    };

    Ok(ConsoleCommand::Event(event))
}

fn required<'a>(keyword: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(keyword))
    } else {
        Ok(rest)
    }
}

fn parse_square(text: &str) -> Result<Square, CommandError> {
    text.to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| CommandError::BadSquare(text.to_string()))
}
