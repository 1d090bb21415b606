use tread_core::{Result, Telemetry, TreadError};

/// Decode one JSON telemetry record.
pub fn parse_record(raw: &str) -> Result<Telemetry> {
    serde_json::from_str(raw).map_err(|e| TreadError::Decode(format!("telemetry record: {e}")))
}

/// Incremental `text/event-stream` decoder.
///
/// Bytes arrive in arbitrary chunks; each completed event yields the joined
/// payload of its `data:` lines. Comments (`:`), `event:`, `id:` and `retry:`
/// fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf:  Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the payloads of every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            if field == "data" {
                self.data.push(value.to_string());
            }
        }

        events
    }
}
