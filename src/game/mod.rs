//! Move interaction and state reconciliation
//!
//! Pure game logic with no rendering and no transport. The presentation
//! layer feeds [`InputEvent`]s into a [`GameSession`] and reads
//! [`SessionSnapshot`]s back; gateway round trips are described as
//! [`GatewayCall`]s and performed by whoever drives the session.
//!
//! # Module Organization
//!
//! - `resources` - Position store, selection, move buffer, busy flag, chat
//! - `session` - The state container and its single dispatch entry point
//! - `events` - Inbound event enum
//! - `types` - Moves, modes and coaching parameters
//! - `error` - Recoverable game errors
//!
//! # Modes
//!
//! **Immediate**: every move goes to the gateway, whose position is adopted
//! as canonical when it answers.
//!
//! **Batched**: moves are applied locally and buffered; coaching is
//! requested for the whole buffer at once, and undo replays locally.

pub mod error;
pub mod events;
pub mod resources;
pub mod session;
pub mod types;

pub use error::{GameError, GameResult};
pub use events::InputEvent;
pub use session::{
    GameSession, GatewayCall, MoveOutcome, Outcome, SessionSnapshot, Step, Ticket, UndoOutcome,
};
pub use types::*;
