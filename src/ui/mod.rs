//! UI module - text rendering for the console client

pub mod text;

pub use text::{describe_outcome, render_board, render_status, render_transcript};
