//! Incremental decoder for OpenAI-style `chat/completions` SSE streams.
//!
//! Network chunks do not respect line or UTF-8 boundaries, so bytes are
//! buffered until a full line is available.

use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Non-empty content delta.
    Delta(String),
    /// Error object sent in place of a chunk.
    Error(String),
    /// `data: [DONE]`
    Done,
}

/// Longest line the decoder will buffer while waiting for a newline.
pub const MAX_LINE_BYTES: usize = 1 << 20;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk; returns the events completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(line.trim_end_matches(['\r', '\n'])) {
                events.push(event);
            }
        }
        if self.buf.len() > MAX_LINE_BYTES {
            let dropped = self.buf.len();
            self.buf.clear();
            events.push(SseEvent::Error(format!(
                "SSE line exceeds {} bytes without a newline ({} buffered)",
                MAX_LINE_BYTES, dropped
            )));
        }
        events
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let json: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            debug!("Ignoring undecodable SSE payload: {}", e);
            return None;
        }
    };
    if let Some(msg) = json["error"]["message"].as_str() {
        return Some(SseEvent::Error(msg.to_string()));
    }
    json["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| SseEvent::Delta(s.to_string()))
}
