//! Interactive front end: terminal input, app state (TuiApp) and drawing (ui).
pub(crate) mod app;
pub(crate) mod editor;
pub(crate) mod events;
mod terminal;
pub(crate) mod ui;

pub use app::{AppAction, TuiApp};
pub use terminal::{check_tui_support, restore_terminal, setup_terminal, Tui};
