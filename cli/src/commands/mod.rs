pub mod cli;
pub mod optimize;
pub mod tui;
