use std::io::{self, Stdout};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use pybebra_core::api::CliError;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn check_tui_support() -> Result<(), CliError> {
    if !atty::is(atty::Stream::Stdout) || !atty::is(atty::Stream::Stdin) {
        return Err(CliError::Terminal(
            "the tui needs an interactive terminal; use `pybebra optimize` instead".to_string(),
        ));
    }
    Ok(())
}

pub fn setup_terminal() -> Result<Tui, CliError> {
    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).map_err(terminal_error)?;

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        prev(info);
    }));

    Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)
}

pub fn restore_terminal(terminal: &mut Tui) -> Result<(), CliError> {
    disable_raw_mode().map_err(terminal_error)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)
}

fn terminal_error(e: io::Error) -> CliError {
    CliError::Terminal(e.to_string())
}
