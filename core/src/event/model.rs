use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step reported by the optimization service, already translated to the
/// client-side tag vocabulary (see [`crate::event::protocol`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub data: Value,
}

impl OptimizationEvent {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Synthetic failure event used for transport errors, timeouts and
    /// streams that end without a final result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(
            EventKind::Error.tag(),
            serde_json::json!({ "message": message.into() }),
        )
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from_tag(&self.event_type)
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    /// Typed view over `data`. Missing or mistyped fields degrade to `None`
    /// rather than failing; rendering never rejects an event.
    pub fn payload(&self) -> EventPayload {
        let d = &self.data;
        match self.kind() {
            EventKind::GenerationStarted => EventPayload::GenerationStarted {
                timestamp: str_field(d, "timestamp"),
            },
            EventKind::RagRetrieved => EventPayload::RagRetrieved {
                code_samples: d
                    .get("code_samples")
                    .and_then(|x| x.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|s| s.as_str().map(|s| s.to_string()))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            EventKind::FuzzWrapperGenerated => EventPayload::FuzzWrapperGenerated {
                code: code_like(d),
            },
            EventKind::FuzzingStarted => EventPayload::FuzzingStarted(d.clone()),
            EventKind::FuzzingFinished => EventPayload::FuzzingFinished(d.clone()),
            EventKind::SampleInputGenerated => EventPayload::SampleInputGenerated(d.clone()),
            EventKind::FunctionGenerated => EventPayload::FunctionGenerated {
                finished: d.get("finished").and_then(|x| x.as_bool()).unwrap_or(false),
                generated_code: str_field(d, "generated_code"),
                differs_on_input: d.get("differs_on_input").and_then(|x| match x {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                }),
            },
            EventKind::FunctionRejected => EventPayload::FunctionRejected {
                reason: str_field(d, "reason")
                    .or_else(|| str_field(d, "message"))
                    .or_else(|| d.as_str().map(|s| s.to_string())),
            },
            EventKind::RanOutOfAttempts => EventPayload::RanOutOfAttempts,
            EventKind::Result => EventPayload::Result {
                generated_code: str_field(d, "generated_code"),
                performance_improvement: d
                    .get("performance_improvement")
                    .filter(|v| !v.is_null())
                    .cloned(),
            },
            EventKind::Error => EventPayload::Error {
                message: str_field(d, "message")
                    .or_else(|| d.as_str().map(|s| s.to_string()))
                    .unwrap_or_else(|| "An error occurred during optimization".to_string()),
            },
            EventKind::Unknown => EventPayload::Unknown {
                tag: self.event_type.clone(),
            },
        }
    }
}

fn str_field(d: &Value, key: &str) -> Option<String> {
    d.get(key).and_then(|x| x.as_str()).map(|s| s.to_string())
}

// The wrapper source is sent either as the bare payload or under one of a few keys.
fn code_like(d: &Value) -> Option<String> {
    if let Some(s) = d.as_str() {
        return Some(s.to_string());
    }
    ["code", "wrapper", "generated_code", "fuzz_wrapper"]
        .iter()
        .find_map(|k| str_field(d, k))
}

/// Client-side event kinds. `Unknown` covers any tag outside the protocol
/// table; such events are kept and rendered with a generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GenerationStarted,
    RagRetrieved,
    FuzzWrapperGenerated,
    FuzzingStarted,
    FuzzingFinished,
    SampleInputGenerated,
    FunctionGenerated,
    FunctionRejected,
    RanOutOfAttempts,
    Result,
    Error,
    Unknown,
}

const KIND_TAGS: &[(EventKind, &str)] = &[
    (EventKind::GenerationStarted, "generation_started"),
    (EventKind::RagRetrieved, "rag_retrieved"),
    (EventKind::FuzzWrapperGenerated, "fuzz_wrapper_generated"),
    (EventKind::FuzzingStarted, "fuzzing_started"),
    (EventKind::FuzzingFinished, "fuzzing_finished"),
    (EventKind::SampleInputGenerated, "sample_input_generated"),
    (EventKind::FunctionGenerated, "function_generated"),
    (EventKind::FunctionRejected, "generated_function_rejected"),
    (EventKind::RanOutOfAttempts, "ran_out_of_attempts"),
    (EventKind::Result, "result"),
    (EventKind::Error, "error"),
];

impl EventKind {
    pub fn from_tag(tag: &str) -> Self {
        KIND_TAGS
            .iter()
            .find(|(_, t)| *t == tag)
            .map(|(k, _)| *k)
            .unwrap_or(EventKind::Unknown)
    }

    pub fn tag(self) -> &'static str {
        KIND_TAGS
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, t)| *t)
            .unwrap_or("unknown")
    }

    pub fn is_terminal(self) -> bool {
        self.terminal_outcome().is_some()
    }

    /// `Some(true)` for a successful finish, `Some(false)` for a failed one.
    pub fn terminal_outcome(self) -> Option<bool> {
        match self {
            EventKind::Result => Some(true),
            EventKind::Error | EventKind::FunctionRejected | EventKind::RanOutOfAttempts => {
                Some(false)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    GenerationStarted {
        timestamp: Option<String>,
    },
    RagRetrieved {
        code_samples: Vec<String>,
    },
    FuzzWrapperGenerated {
        code: Option<String>,
    },
    FuzzingStarted(Value),
    FuzzingFinished(Value),
    SampleInputGenerated(Value),
    FunctionGenerated {
        finished: bool,
        generated_code: Option<String>,
        differs_on_input: Option<String>,
    },
    FunctionRejected {
        reason: Option<String>,
    },
    RanOutOfAttempts,
    Result {
        generated_code: Option<String>,
        performance_improvement: Option<Value>,
    },
    Error {
        message: String,
    },
    Unknown {
        tag: String,
    },
}
