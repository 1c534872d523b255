use crate::models::ChatChunk;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit of the completion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Incremental text fragment. May be empty: housekeeping chunks decode
    /// to empty fragments and still count as frames.
    Delta(String),
    /// Terminal sentinel. Nothing after it is read.
    Done,
}

/// Incremental parser for SSE-style `data: ` line streams.
///
/// Network chunk boundaries fall anywhere, including inside a multi-byte
/// UTF-8 sequence, so the residual buffer holds raw bytes and a line is only
/// decoded once its `\n` has arrived. Feeding the same bytes in different
/// chunkings yields the same frames.
#[derive(Debug, Default)]
pub struct SseLineParser {
    buffer: Vec<u8>,
}

impl SseLineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk and drain every frame it completes, in order.
    ///
    /// Lines without the `data: ` prefix and payloads that fail to parse as
    /// JSON are skipped; both occur in healthy streams (comments,
    /// keep-alives) and must not abort the read.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let decoded = String::from_utf8_lossy(&line[..newline]);
            let decoded = decoded.strip_suffix('\r').unwrap_or(&decoded);
            if let Some(frame) = parse_line(decoded) {
                frames.push(frame);
            }
        }
        frames
    }

    /// True when no partial line is waiting on further bytes. A non-empty
    /// buffer at end of stream is an unterminated line and is discarded.
    pub fn is_buffer_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn parse_line(line: &str) -> Option<StreamFrame> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return Some(StreamFrame::Done);
    }
    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => Some(StreamFrame::Delta(chunk.into_fragment())),
        Err(_) => None,
    }
}
