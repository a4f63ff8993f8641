//! Wire format of the optimization service and its translation into
//! client-side events.
//!
//! The service has shipped two tag vocabularies. The streaming one
//! (`result`, `function_generated`, `fuzzing_*`) is canonical here; tags from
//! the older JSON integration (`started`, `generation_attempt`,
//! `optimization_success`) are accepted as aliases.

use serde::Deserialize;
use serde_json::Value;

use crate::event::model::OptimizationEvent;

/// Prefix of every payload-carrying line in the stream.
pub const DATA_PREFIX: &str = "data:";

/// A frame as sent by the server, before tag mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerFrame {
    pub event_type: String,

    #[serde(default)]
    pub data: Value,
}

const TAG_RENAMES: &[(&str, &str)] = &[
    ("started", "generation_started"),
    ("generation_started", "generation_started"),
    ("rag_retrieved", "rag_retrieved"),
    ("fuzz_wrapper_generated", "fuzz_wrapper_generated"),
    ("fuzzing_started", "fuzzing_started"),
    ("fuzzing_finished", "fuzzing_finished"),
    ("sample_input_generated", "sample_input_generated"),
    ("generation_attempt", "function_generated"),
    ("function_generated", "function_generated"),
    ("generated_function_rejected", "generated_function_rejected"),
    ("ran_out_of_attempts", "ran_out_of_attempts"),
    ("optimization_success", "result"),
    ("result", "result"),
    ("error", "error"),
];

/// Maps a server tag to its client tag. Unknown tags pass through unchanged.
pub fn client_tag(server_tag: &str) -> &str {
    TAG_RENAMES
        .iter()
        .find(|(from, _)| *from == server_tag)
        .map(|(_, to)| *to)
        .unwrap_or(server_tag)
}

impl ServerFrame {
    pub fn into_event(self) -> OptimizationEvent {
        let tag = client_tag(&self.event_type).to_string();
        let data = if tag == "result" {
            normalize_result(self.data)
        } else {
            self.data
        };
        OptimizationEvent::new(tag, data)
    }
}

/// Renames `improved_function`/`ratio` to `generated_code`/`performance_improvement`.
/// Payloads already in the client shape are left alone; unrelated keys survive.
pub fn normalize_result(data: Value) -> Value {
    let Value::Object(mut map) = data else {
        return data;
    };
    if let Some(code) = map.remove("improved_function") {
        map.entry("generated_code").or_insert(code);
    }
    if let Some(ratio) = map.remove("ratio") {
        map.entry("performance_improvement").or_insert(ratio);
    }
    Value::Object(map)
}

/// Parses one line of the stream. Returns `None` for anything that is not a
/// well-formed `data:` frame.
pub fn parse_frame_line(line: &str) -> Option<OptimizationEvent> {
    let s = line.trim();
    let json_part = s.strip_prefix(DATA_PREFIX)?.trim();
    if json_part.is_empty() {
        return None;
    }
    match serde_json::from_str::<ServerFrame>(json_part) {
        Ok(frame) => Some(frame.into_event()),
        Err(e) => {
            tracing::debug!(
                target: "pybebra.protocol",
                error = %e,
                bytes = json_part.len(),
                "skipping malformed frame"
            );
            None
        }
    }
}
