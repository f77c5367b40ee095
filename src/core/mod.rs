//! Core module - application infrastructure
//!
//! Everything the client needs before a game can start:
//!
//! - [`CoachSettings`] - user preferences, persisted as JSON
//! - [`settings_persistence`] - load/save against the user config directory
//! - [`logging`] - tracing subscriber for the binary
//! - [`CoreError`] - settings and configuration failures

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use settings::{parse_intensity, CoachSettings};
