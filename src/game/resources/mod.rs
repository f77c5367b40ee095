//! Game resources - state owned by the session
//!
//! Each resource is a plain struct with no I/O. The session composes them
//! and is the only thing that mutates them.
//!
//! # Resource Categories
//!
//! ## Board
//! - [`PositionStore`] - Current position plus rules-engine queries
//! - [`GameStatus`] - Check, mate and draw detection
//!
//! ## Player Interaction
//! - [`Selection`] - Currently selected piece and its legal destinations
//! - [`HighlightState`] - Last move and selection as the board draws them
//!
//! ## Batching
//! - [`MoveHistoryBuffer`] - Moves applied locally, not yet coached
//!
//! ## Gateway Coordination
//! - [`PendingRequest`] - Busy flag for game-mutating requests
//! - [`ChatLog`] - Follow-up question transcript with its own in-flight slot

pub mod chat;
pub mod highlight;
pub mod history;
pub mod pending;
pub mod position;
pub mod selection;

pub use chat::*;
pub use highlight::*;
pub use history::*;
pub use pending::*;
pub use position::*;
pub use selection::*;
