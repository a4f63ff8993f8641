use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use pybebra_core::api::{Run, RunError, RunStatus, RunStore, Transition, UiConfig};

use super::editor::Editor;
use super::events::{InputEvent, StreamMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Runs,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    /// Start streaming `code` for the freshly opened run.
    Submit { run_id: String, code: String },
}

pub struct TuiApp {
    pub editor: Editor,
    pub store: RunStore,
    pub focus: Focus,
    /// Index into [`TuiApp::runs`].
    pub selected: usize,
    pub ascii: bool,
    pub show_details: bool,
    pub status: Option<String>,
    pub tick: usize,
    expanded: HashSet<String>,
}

impl TuiApp {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            editor: Editor::from_text(&ui.sample_code),
            store: RunStore::new(),
            focus: Focus::Editor,
            selected: 0,
            ascii: ui.ascii,
            show_details: ui.show_details,
            status: None,
            tick: 0,
            expanded: HashSet::new(),
        }
    }

    /// Current run first, then history (most recent first).
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.store.current().into_iter().chain(self.store.history())
    }

    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    pub fn selected_run(&self) -> Option<&Run> {
        self.runs().nth(self.selected)
    }

    pub fn is_expanded(&self, run_id: &str) -> bool {
        self.expanded.contains(run_id)
    }

    pub fn toggle(&mut self, run_id: &str) {
        if !self.expanded.remove(run_id) {
            self.expanded.insert(run_id.to_string());
        }
    }

    pub fn handle_input(&mut self, input: InputEvent) -> AppAction {
        match input {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                if self.focus == Focus::Editor {
                    for c in text.chars() {
                        match c {
                            '\n' => self.editor.insert_newline(),
                            '\r' => {}
                            c => self.editor.insert_char(c),
                        }
                    }
                }
                AppAction::None
            }
            InputEvent::Resize => AppAction::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind != KeyEventKind::Press {
            return AppAction::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Char('o') if ctrl => return self.submit(),
            KeyCode::Char('l') if ctrl && self.focus == Focus::Editor => {
                self.editor.clear();
                return AppAction::None;
            }
            KeyCode::F(5) => return self.submit(),
            KeyCode::BackTab => {
                self.switch_focus();
                return AppAction::None;
            }
            _ => {}
        }
        match self.focus {
            Focus::Editor => self.editor_key(key),
            Focus::Runs => self.runs_key(key),
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Runs,
            Focus::Runs => Focus::Editor,
        };
    }

    fn editor_key(&mut self, key: KeyEvent) -> AppAction {
        let e = &mut self.editor;
        match key.code {
            KeyCode::Esc => self.focus = Focus::Runs,
            KeyCode::Char(c) => e.insert_char(c),
            KeyCode::Tab => e.insert_indent(),
            KeyCode::Enter => e.insert_newline(),
            KeyCode::Backspace => e.backspace(),
            KeyCode::Delete => e.delete(),
            KeyCode::Left => e.move_left(),
            KeyCode::Right => e.move_right(),
            KeyCode::Up => e.move_up(),
            KeyCode::Down => e.move_down(),
            KeyCode::Home => e.home(),
            KeyCode::End => e.end(),
            _ => {}
        }
        AppAction::None
    }

    fn runs_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Tab | KeyCode::Char('e') | KeyCode::Char('i') => self.focus = Focus::Editor,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.run_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_run().map(|r| r.id.clone()) {
                    self.toggle(&id);
                }
            }
            KeyCode::Char('d') => self.show_details = !self.show_details,
            KeyCode::Char('c') => self.copy_selected(),
            _ => {}
        }
        AppAction::None
    }

    pub fn submit(&mut self) -> AppAction {
        let code = self.editor.text();
        match self.store.begin(&code) {
            Ok(run) => {
                let run_id = run.id.clone();
                self.expanded.clear();
                self.expanded.insert(run_id.clone());
                self.selected = 0;
                self.status = Some("Optimizing...".to_string());
                AppAction::Submit { run_id, code }
            }
            Err(RunError::EmptyCode) => {
                self.status = Some("Paste your Python function first".to_string());
                AppAction::None
            }
            Err(e) => {
                self.status = Some(e.to_string());
                AppAction::None
            }
        }
    }

    pub fn on_stream(&mut self, msg: StreamMessage) {
        let transition = match msg {
            StreamMessage::Event { run_id, event } => self.store.apply(&run_id, event),
            StreamMessage::Finished { run_id } => self.store.finish_stream(&run_id),
        };
        if let Transition::Finalized(status) = transition {
            self.status = Some(match status {
                RunStatus::Success => "Optimization finished, press c in the runs pane to copy".to_string(),
                _ => "Optimization failed".to_string(),
            });
        }
    }

    fn copy_selected(&mut self) {
        let Some(code) = self.selected_run().and_then(|r| r.optimized_code.clone()) else {
            self.status = Some("Selected run has no optimized code".to_string());
            return;
        };
        let res = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(code));
        self.status = Some(match res {
            Ok(()) => "Optimized code copied to clipboard".to_string(),
            Err(e) => {
                tracing::warn!(target: "pybebra.tui", error = %e, "clipboard copy failed");
                format!("Clipboard unavailable: {e}")
            }
        });
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}
