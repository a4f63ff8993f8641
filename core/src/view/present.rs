use serde_json::Value;

use crate::event::{EventKind, EventPayload, OptimizationEvent};
use crate::run::RunStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Spinner,
    Database,
    Code,
    Flask,
    Input,
    Check,
    Cross,
    Alert,
}

impl Icon {
    pub fn glyph(self, ascii: bool) -> &'static str {
        match (self, ascii) {
            (Icon::Spinner, false) => "◌",
            (Icon::Spinner, true) => "[..]",
            (Icon::Database, false) => "⛁",
            (Icon::Database, true) => "[db]",
            (Icon::Code, false) => "</>",
            (Icon::Code, true) => "[<>]",
            (Icon::Flask, false) => "⚗",
            (Icon::Flask, true) => "[fz]",
            (Icon::Input, false) => "⌨",
            (Icon::Input, true) => "[in]",
            (Icon::Check, false) => "✓",
            (Icon::Check, true) => "[OK]",
            (Icon::Cross, false) => "✗",
            (Icon::Cross, true) => "[XX]",
            (Icon::Alert, false) => "!",
            (Icon::Alert, true) => "[??]",
        }
    }
}

/// Colour family a front end should use for an icon or status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Accent,
    Warn,
    Success,
    Danger,
    Muted,
}

/// A collapsible block of code attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub label: String,
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventView {
    pub kind: EventKind,
    pub icon: Icon,
    pub tone: Tone,
    pub title: String,
    pub note: Option<String>,
    pub panels: Vec<DetailPanel>,
}

const STYLES: &[(EventKind, Icon, Tone)] = &[
    (EventKind::GenerationStarted, Icon::Spinner, Tone::Info),
    (EventKind::RagRetrieved, Icon::Database, Tone::Accent),
    (EventKind::FuzzWrapperGenerated, Icon::Code, Tone::Accent),
    (EventKind::FuzzingStarted, Icon::Flask, Tone::Info),
    (EventKind::FuzzingFinished, Icon::Flask, Tone::Info),
    (EventKind::SampleInputGenerated, Icon::Input, Tone::Info),
    (EventKind::FunctionGenerated, Icon::Code, Tone::Warn),
    (EventKind::FunctionRejected, Icon::Cross, Tone::Danger),
    (EventKind::RanOutOfAttempts, Icon::Cross, Tone::Danger),
    (EventKind::Result, Icon::Check, Tone::Success),
    (EventKind::Error, Icon::Cross, Tone::Danger),
];

pub fn style_of(kind: EventKind) -> (Icon, Tone) {
    STYLES
        .iter()
        .find(|(k, _, _)| *k == kind)
        .map(|(_, i, t)| (*i, *t))
        .unwrap_or((Icon::Alert, Tone::Muted))
}

pub fn status_style(status: RunStatus) -> (Icon, Tone) {
    match status {
        RunStatus::Running => (Icon::Spinner, Tone::Info),
        RunStatus::Success => (Icon::Check, Tone::Success),
        RunStatus::Failed => (Icon::Cross, Tone::Danger),
    }
}

pub fn present(event: &OptimizationEvent) -> EventView {
    let kind = event.kind();
    let (icon, tone) = style_of(kind);
    let mut note = None;
    let mut panels = Vec::new();

    let title = match event.payload() {
        EventPayload::GenerationStarted { .. } => "Generation started".to_string(),
        EventPayload::RagRetrieved { code_samples } => {
            let title = format!("RAG retrieved {} code samples", code_samples.len());
            if !code_samples.is_empty() {
                panels.push(DetailPanel {
                    label: "View code samples".to_string(),
                    blocks: code_samples,
                });
            }
            title
        }
        EventPayload::FuzzWrapperGenerated { code } => {
            if let Some(code) = code {
                panels.push(DetailPanel {
                    label: "View fuzz wrapper".to_string(),
                    blocks: vec![code],
                });
            }
            "Fuzz wrapper generated".to_string()
        }
        EventPayload::FuzzingStarted(_) => "Fuzzing started".to_string(),
        EventPayload::FuzzingFinished(_) => "Fuzzing finished".to_string(),
        EventPayload::SampleInputGenerated(data) => {
            if let Some(text) = textual(&data) {
                panels.push(DetailPanel {
                    label: "View sample input".to_string(),
                    blocks: vec![text],
                });
            }
            "Sample input generated".to_string()
        }
        EventPayload::FunctionGenerated {
            finished,
            generated_code,
            differs_on_input,
        } => {
            if let Some(code) = generated_code {
                panels.push(DetailPanel {
                    label: "View generated code".to_string(),
                    blocks: vec![code],
                });
            }
            if finished {
                "Generation successful".to_string()
            } else {
                let input = differs_on_input.unwrap_or_else(|| "unknown".to_string());
                note = Some(format!("Failed on input: {input}"));
                format!("Generation attempt failed: {input}")
            }
        }
        EventPayload::FunctionRejected { reason } => match reason {
            Some(r) => format!("Generated function rejected: {r}"),
            None => "Generated function rejected".to_string(),
        },
        EventPayload::RanOutOfAttempts => "Ran out of optimization attempts".to_string(),
        EventPayload::Result {
            performance_improvement,
            ..
        } => match performance_improvement.as_ref().and_then(|v| v.as_f64()) {
            Some(ratio) => format!("Optimization completed successfully ({ratio:.2}x faster)"),
            None => "Optimization completed successfully".to_string(),
        },
        EventPayload::Error { message } => format!("Error: {message}"),
        EventPayload::Unknown { tag } => format!("Unknown event ({tag})"),
    };

    EventView {
        kind,
        icon,
        tone,
        title,
        note,
        panels,
    }
}

fn textual(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) if map.is_empty() => None,
        other => serde_json::to_string_pretty(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rag_title_counts_samples_and_exposes_panel() {
        let v = present(&OptimizationEvent::new(
            "rag_retrieved",
            json!({ "code_samples": ["a", "b", "c"] }),
        ));
        assert_eq!(v.title, "RAG retrieved 3 code samples");
        assert_eq!(v.icon, Icon::Database);
        assert_eq!(v.panels.len(), 1);
        assert_eq!(v.panels[0].blocks, vec!["a", "b", "c"]);
    }

    #[test]
    fn failed_attempt_carries_input_note() {
        let v = present(&OptimizationEvent::new(
            "function_generated",
            json!({ "finished": false, "generated_code": "def f(): pass", "differs_on_input": "(5,)" }),
        ));
        assert_eq!(v.title, "Generation attempt failed: (5,)");
        assert_eq!(v.note.as_deref(), Some("Failed on input: (5,)"));
        assert_eq!(v.panels[0].label, "View generated code");
    }

    #[test]
    fn successful_attempt_has_no_note() {
        let v = present(&OptimizationEvent::new(
            "function_generated",
            json!({ "finished": true, "generated_code": "x", "differs_on_input": null }),
        ));
        assert_eq!(v.title, "Generation successful");
        assert!(v.note.is_none());
    }

    #[test]
    fn result_title_mentions_numeric_ratio_only() {
        let v = present(&OptimizationEvent::new(
            "result",
            json!({ "generated_code": "x", "performance_improvement": 2.5 }),
        ));
        assert_eq!(v.title, "Optimization completed successfully (2.50x faster)");
        assert_eq!(v.tone, Tone::Success);

        let v = present(&OptimizationEvent::new(
            "result",
            json!({ "generated_code": "x", "performance_improvement": "N/A" }),
        ));
        assert_eq!(v.title, "Optimization completed successfully");
    }

    #[test]
    fn unknown_tag_falls_back() {
        let v = present(&OptimizationEvent::new("warmup", json!({})));
        assert_eq!(v.kind, EventKind::Unknown);
        assert_eq!(v.icon, Icon::Alert);
        assert_eq!(v.title, "Unknown event (warmup)");
    }

    #[test]
    fn every_known_kind_has_a_style() {
        for (kind, _, _) in STYLES {
            assert_ne!(style_of(*kind).0, Icon::Alert);
        }
    }

    #[test]
    fn ascii_glyphs_are_ascii() {
        for icon in [
            Icon::Spinner,
            Icon::Database,
            Icon::Code,
            Icon::Flask,
            Icon::Input,
            Icon::Check,
            Icon::Cross,
            Icon::Alert,
        ] {
            assert!(icon.glyph(true).is_ascii());
        }
    }
}
