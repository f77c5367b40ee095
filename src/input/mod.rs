//! Input module - console commands and the interactive loop
//!
//! - `commands` - parse one line into a session event or a console action
//! - `console` - stdin loop that drives a [`SessionDriver`](crate::networking::SessionDriver)

pub mod commands;
pub mod console;

pub use commands::{parse_command, CommandError, ConsoleCommand};
pub use console::run_console;
