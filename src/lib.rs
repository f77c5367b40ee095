pub mod core;
pub mod game;
pub mod input;
pub mod networking;
pub mod ui;
