use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use pybebra_core::api::{present, status_style, Icon, Run, RunStatus, Tone};

use super::app::{Focus, TuiApp};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const ASCII_SPINNER: &[&str] = &["|", "/", "-", "\\"];

pub fn draw(frame: &mut Frame, app: &TuiApp) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [editor_area, runs_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("PyBebra", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" optimizes your awful Python code"),
        ])),
        header,
    );
    draw_editor(frame, app, editor_area);
    draw_runs(frame, app, runs_area);
    draw_footer(frame, app, footer);
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn draw_editor(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let block = pane(" Code ", focused);
    let inner = block.inner(area);

    let (row, col) = app.editor.cursor();
    let height = inner.height.max(1) as usize;
    let width = inner.width.max(1) as usize;
    let scroll_y = row.saturating_sub(height - 1);
    let scroll_x = col.saturating_sub(width - 1);

    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .map(|l| Line::raw(l.as_str()))
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((scroll_y as u16, scroll_x as u16)),
        area,
    );

    if focused {
        frame.set_cursor_position(Position::new(
            inner.x + (col - scroll_x) as u16,
            inner.y + (row - scroll_y) as u16,
        ));
    }
}

fn draw_runs(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let block = pane(" Runs ", app.focus == Focus::Runs);
    let inner_height = block.inner(area).height as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    let mut in_history = false;
    if app.store.current().is_some() {
        lines.push(section("Current Optimization"));
    }
    for (idx, run) in app.runs().enumerate() {
        if run.status.is_terminal() && !in_history {
            in_history = true;
            lines.push(section("Optimization History"));
        }
        if idx == app.selected {
            selected_line = lines.len();
        }
        run_lines(app, run, idx == app.selected, &mut lines);
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "No runs yet. Press Ctrl+O or F5 to optimize the code on the left.",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let scroll = selected_line.saturating_sub(inner_height / 3);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0)),
        area,
    );
}

fn section(title: &str) -> Line<'static> {
    Line::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )
}

fn glyph(app: &TuiApp, icon: Icon) -> String {
    if icon == Icon::Spinner {
        let frames = if app.ascii { ASCII_SPINNER } else { SPINNER };
        return frames[app.tick % frames.len()].to_string();
    }
    icon.glyph(app.ascii).to_string()
}

fn run_lines(app: &TuiApp, run: &Run, selected: bool, out: &mut Vec<Line<'static>>) {
    let expanded = app.is_expanded(&run.id);
    let (icon, tone) = status_style(run.status);
    let marker = match (expanded, app.ascii) {
        (true, false) => "▾ ",
        (false, false) => "▸ ",
        (true, true) => "v ",
        (false, true) => "> ",
    };
    let mut header = Style::default().add_modifier(Modifier::BOLD);
    if selected {
        header = header.add_modifier(Modifier::REVERSED);
    }
    out.push(Line::from(vec![
        Span::styled(marker.to_string(), header),
        Span::styled(format!("{} ", glyph(app, icon)), Style::default().fg(tone_color(tone))),
        Span::styled(format!("Run ID: {}", run.id), header),
        Span::styled(format!("  {}", run.time_label()), Style::default().fg(Color::DarkGray)),
    ]));
    if !expanded {
        return;
    }

    code_lines("Original Code", &run.original_code, out);
    for event in &run.events {
        let view = present(event);
        out.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{} ", glyph(app, view.icon)),
                Style::default().fg(tone_color(view.tone)),
            ),
            Span::raw(view.title),
        ]));
        if let Some(note) = view.note {
            out.push(Line::styled(
                format!("      {note}"),
                Style::default().fg(Color::Red),
            ));
        }
        for panel in view.panels {
            if app.show_details {
                for block in &panel.blocks {
                    code_lines(&panel.label, block, out);
                }
            } else {
                out.push(Line::styled(
                    format!("      {} ({}, press d)", panel.label, panel.blocks.len()),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }
    if run.status == RunStatus::Running {
        out.push(Line::styled(
            "  Waiting for the optimization service...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(code) = &run.optimized_code {
        code_lines("Optimized Code", code, out);
    }
    out.push(Line::raw(""));
}

fn code_lines(heading: &str, code: &str, out: &mut Vec<Line<'static>>) {
    out.push(Line::styled(
        format!("    {heading}"),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ));
    for l in code.lines() {
        out.push(Line::styled(
            format!("    │ {l}"),
            Style::default().fg(Color::Gray),
        ));
    }
}

fn draw_footer(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let help = match app.focus {
        Focus::Editor => "Ctrl+O/F5 optimize  Ctrl+L clear  Esc runs pane  Ctrl+C quit",
        Focus::Runs => "↑↓ select  Enter expand  d details  c copy  Tab editor  q quit",
    };
    let mut spans = vec![Span::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.as_str(), Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => Color::Blue,
        Tone::Accent => Color::Magenta,
        Tone::Warn => Color::Yellow,
        Tone::Success => Color::Green,
        Tone::Danger => Color::Red,
        Tone::Muted => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybebra_core::api::{AppConfig, OptimizationEvent};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    use crate::tui::app::AppAction;
    use crate::tui::events::StreamMessage;

    fn screen(app: &TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let width = buf.area.width as usize;
        let mut out = String::new();
        for (i, cell) in buf.content.iter().enumerate() {
            out.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                out.push('\n');
            }
        }
        out
    }

    #[test]
    fn empty_state_shows_hint() {
        let app = TuiApp::new(&AppConfig::default().ui);
        let s = screen(&app);
        assert!(s.contains("def fibonacci(n):"));
        assert!(s.contains("No runs yet"));
    }

    #[test]
    fn finished_run_lists_timeline_under_history() {
        let mut app = TuiApp::new(&AppConfig::default().ui);
        let AppAction::Submit { run_id, .. } = app.submit() else {
            panic!("expected submit");
        };
        app.on_stream(StreamMessage::Event {
            run_id: run_id.clone(),
            event: OptimizationEvent::new("rag_retrieved", json!({ "code_samples": ["a"] })),
        });
        app.on_stream(StreamMessage::Event {
            run_id: run_id.clone(),
            event: OptimizationEvent::new(
                "result",
                json!({ "generated_code": "def fast(n): pass", "performance_improvement": 4.0 }),
            ),
        });

        let s = screen(&app);
        assert!(s.contains("Optimization History"));
        assert!(!s.contains("Current Optimization"));
        assert!(s.contains(&format!("Run ID: {run_id}")));
        assert!(s.contains("RAG retrieved 1 code samples"));
        assert!(s.contains("Optimization completed successfully (4.00x faster)"));
        assert!(s.contains("def fast(n): pass"));
    }
}
