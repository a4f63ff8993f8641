use bytes::BytesMut;

use crate::event::model::OptimizationEvent;
use crate::event::protocol::{parse_frame_line, DATA_PREFIX};

/// Incremental decoder for the newline-delimited `data:` stream.
///
/// Network reads may end anywhere, including inside a multi-byte UTF-8
/// sequence, so raw bytes are buffered and only complete lines are decoded.
/// The incomplete tail stays in the buffer until the next `push` or `finish`.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
    skipped: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<OptimizationEvent> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos + 1);
            self.decode_line(&line[..pos], &mut out);
        }
        out
    }

    /// Flushes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<OptimizationEvent> {
        let mut out = Vec::new();
        if !self.buf.is_empty() {
            let rest = self.buf.split();
            self.decode_line(&rest, &mut out);
        }
        out
    }

    /// Number of `data:` lines dropped because they did not parse.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    fn decode_line(&mut self, raw: &[u8], out: &mut Vec<OptimizationEvent>) {
        let text = String::from_utf8_lossy(raw);
        match parse_frame_line(&text) {
            Some(ev) => out.push(ev),
            None => {
                if text.trim_start().starts_with(DATA_PREFIX) {
                    self.skipped += 1;
                }
            }
        }
    }
}
