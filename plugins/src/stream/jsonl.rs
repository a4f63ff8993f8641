use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use pybebra_core::api::{OptimizationEvent, Run, RunRenderer};

/// One line of machine-readable output.
#[derive(Debug, Clone, Serialize)]
pub struct WrapperLine<'a> {
    pub v: i32,
    #[serde(rename = "type")]
    pub event_type: &'a str,
    pub ts: String,
    pub run_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl<'a> WrapperLine<'a> {
    pub fn new(event_type: &'a str, run_id: &'a str, data: Option<Value>) -> Self {
        Self {
            v: 1,
            event_type,
            ts: chrono::Local::now().to_rfc3339(),
            run_id,
            data,
        }
    }
}

/// Writes `run.start`, every event, then `run.end` as JSON lines.
pub struct JsonlRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonlRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &WrapperLine<'_>) {
        let res = serde_json::to_string(line)
            .map_err(std::io::Error::from)
            .and_then(|s| writeln!(self.out, "{s}"))
            .and_then(|_| self.out.flush());
        if let Err(e) = res {
            tracing::debug!(target: "pybebra.render", error = %e, "jsonl output write failed");
        }
    }
}

impl<W: Write + Send> RunRenderer for JsonlRenderer<W> {
    fn on_start(&mut self, run: &Run) {
        let data = serde_json::json!({ "original_code": run.original_code });
        self.emit(&WrapperLine::new("run.start", &run.id, Some(data)));
    }

    fn on_event(&mut self, run_id: &str, event: &OptimizationEvent) {
        let data = (!event.data.is_null()).then(|| event.data.clone());
        self.emit(&WrapperLine::new(&event.event_type, run_id, data));
    }

    fn on_finish(&mut self, run: &Run) {
        let data = serde_json::json!({
            "status": run.status,
            "events": run.events.len(),
            "optimized_code": run.optimized_code,
        });
        self.emit(&WrapperLine::new("run.end", &run.id, Some(data)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pybebra_core::api::RunStatus;
    use serde_json::json;

    fn lines(buf: Vec<u8>) -> Vec<Value> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn wraps_run_lifecycle_and_events() {
        let mut run = Run::new("run-42".to_string(), "def f(): pass".to_string());
        let mut r = JsonlRenderer::new(Vec::new());
        r.on_start(&run);
        r.on_event(
            "run-42",
            &OptimizationEvent::new("result", json!({ "generated_code": "x", "performance_improvement": 3.0 })),
        );
        run.status = RunStatus::Success;
        run.optimized_code = Some("x".to_string());
        r.on_finish(&run);

        let out = lines(r.into_inner());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["type"], "run.start");
        assert_eq!(out[0]["v"], 1);
        assert_eq!(out[0]["data"]["original_code"], "def f(): pass");
        assert_eq!(out[1]["type"], "result");
        assert_eq!(out[1]["run_id"], "run-42");
        assert_eq!(out[1]["data"]["performance_improvement"], 3.0);
        assert_eq!(out[2]["type"], "run.end");
        assert_eq!(out[2]["data"]["status"], "success");
        assert_eq!(out[2]["data"]["optimized_code"], "x");
    }

    #[test]
    fn null_data_is_omitted() {
        let mut r = JsonlRenderer::new(Vec::new());
        r.on_event("run-1", &OptimizationEvent::new("ran_out_of_attempts", Value::Null));
        let out = lines(r.into_inner());
        assert!(out[0].get("data").is_none());
        assert!(out[0]["ts"].is_string());
    }
}
