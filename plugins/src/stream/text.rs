use std::fmt::Display;
use std::io::Write;

use crossterm::style::{Color, Stylize};

use pybebra_core::api::{present, status_style, OptimizationEvent, Run, RunRenderer, Tone};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    pub ascii: bool,
    /// Print detail panels (samples, generated code) instead of just their labels.
    pub details: bool,
    pub color: bool,
}

/// Human-readable timeline, one line per event.
pub struct TextRenderer<W: Write + Send> {
    out: W,
    opts: TextOptions,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W, opts: TextOptions) -> Self {
        Self { out, opts }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, s: &str, tone: Tone) -> String {
        if !self.opts.color {
            return s.to_string();
        }
        s.with(tone_color(tone)).to_string()
    }

    fn line(&mut self, s: impl Display) {
        if let Err(e) = writeln!(self.out, "{s}") {
            tracing::debug!(target: "pybebra.render", error = %e, "text output write failed");
        }
    }

    fn code_block(&mut self, heading: &str, code: &str) {
        self.line(format!("  {heading}"));
        let bar = if self.opts.ascii { "|" } else { "│" };
        for l in code.lines() {
            self.line(format!("    {bar} {l}"));
        }
    }
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => Color::Blue,
        Tone::Accent => Color::Magenta,
        Tone::Warn => Color::Yellow,
        Tone::Success => Color::Green,
        Tone::Danger => Color::Red,
        Tone::Muted => Color::DarkGrey,
    }
}

impl<W: Write + Send> RunRenderer for TextRenderer<W> {
    fn on_start(&mut self, run: &Run) {
        let (icon, tone) = status_style(run.status);
        let glyph = self.paint(icon.glyph(self.opts.ascii), tone);
        self.line(format!("{glyph} Run ID: {}  {}", run.id, run.time_label()));
        if self.opts.details {
            self.code_block("Original Code", &run.original_code);
        }
    }

    fn on_event(&mut self, _run_id: &str, event: &OptimizationEvent) {
        let view = present(event);
        let glyph = self.paint(view.icon.glyph(self.opts.ascii), view.tone);
        self.line(format!("  {glyph} {}", view.title));
        if let Some(note) = &view.note {
            let note = self.paint(note, Tone::Danger);
            self.line(format!("      {note}"));
        }
        for panel in &view.panels {
            if self.opts.details {
                for block in &panel.blocks {
                    self.code_block(&format!("  {}", panel.label), block);
                }
            } else {
                self.line(format!("      ({}: {} block(s), use --details)", panel.label, panel.blocks.len()));
            }
        }
    }

    fn on_finish(&mut self, run: &Run) {
        let (icon, tone) = status_style(run.status);
        let glyph = self.paint(icon.glyph(self.opts.ascii), tone);
        self.line(format!(
            "{glyph} Run {} {} ({} events)",
            run.id,
            run.status.as_str(),
            run.events.len()
        ));
        if let Some(code) = &run.optimized_code {
            self.code_block("Optimized Code", code);
        }
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybebra_core::api::RunStatus;
    use serde_json::json;

    fn run_with(status: RunStatus, optimized: Option<&str>) -> Run {
        let mut run = Run::new("run-1".to_string(), "def f(): return 0".to_string());
        run.status = status;
        run.optimized_code = optimized.map(|s| s.to_string());
        run
    }

    fn render(opts: TextOptions, f: impl FnOnce(&mut TextRenderer<Vec<u8>>)) -> String {
        let mut r = TextRenderer::new(Vec::new(), opts);
        f(&mut r);
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn event_lines_use_titles_and_ascii_glyphs() {
        let out = render(
            TextOptions {
                ascii: true,
                ..Default::default()
            },
            |r| {
                r.on_event(
                    "run-1",
                    &OptimizationEvent::new("rag_retrieved", json!({ "code_samples": ["a", "b"] })),
                );
                r.on_event(
                    "run-1",
                    &OptimizationEvent::new(
                        "function_generated",
                        json!({ "finished": false, "generated_code": "x", "differs_on_input": "7" }),
                    ),
                );
            },
        );
        assert!(out.contains("[db] RAG retrieved 2 code samples"));
        assert!(out.contains("(View code samples: 2 block(s), use --details)"));
        assert!(out.contains("[<>] Generation attempt failed: 7"));
        assert!(out.contains("Failed on input: 7"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn details_print_code_blocks() {
        let out = render(
            TextOptions {
                ascii: true,
                details: true,
                color: false,
            },
            |r| {
                r.on_event(
                    "run-1",
                    &OptimizationEvent::new("fuzz_wrapper_generated", json!("def wrap():\n    pass")),
                );
            },
        );
        assert!(out.contains("View fuzz wrapper"));
        assert!(out.contains("    | def wrap():"));
        assert!(out.contains("    |     pass"));
    }

    #[test]
    fn finish_prints_optimized_code() {
        let out = render(TextOptions::default(), |r| {
            r.on_finish(&run_with(RunStatus::Success, Some("def f(): return 1")));
        });
        assert!(out.starts_with("✓ Run run-1 success (0 events)"));
        assert!(out.contains("Optimized Code"));
        assert!(out.contains("│ def f(): return 1"));
    }

    #[test]
    fn color_wraps_glyph_in_ansi() {
        let out = render(
            TextOptions {
                color: true,
                ..Default::default()
            },
            |r| r.on_finish(&run_with(RunStatus::Failed, None)),
        );
        assert!(out.contains('\u{1b}'));
        assert!(out.contains("failed"));
    }
}
