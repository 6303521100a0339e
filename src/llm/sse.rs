//! Server-sent event decoding for streamed generations.

use futures::{stream, Stream, StreamExt};
use std::collections::VecDeque;
use tracing::debug;

use super::types::StreamChunk;
use crate::error::LlmError;
use crate::TARGET_LLM_REQUEST;

/// Incremental SSE parser. Bytes are buffered until a full line is available,
/// so multi-byte characters and payloads split across network chunks survive.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the data of every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = self.line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is left once the byte stream ends.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        if !rest.is_empty() {
            // An unterminated final line still belongs to the last event.
            if let Some(event) = self.line(&rest) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn line(&mut self, raw: &[u8]) -> Option<String> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);

        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data
                .push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        // Comments and other fields (event:, id:, retry:) carry nothing we use.
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let event = self.data.join("\n");
        self.data.clear();
        Some(event)
    }
}

/// Extract the generated text from one event payload.
///
/// Returns `Ok(None)` for events that carry no text, such as the final
/// usage-metadata chunk.
pub fn event_text(payload: &str) -> Result<Option<String>, LlmError> {
    if payload.trim() == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)?;
    if let Some(error) = chunk.error {
        return Err(LlmError::Api(match error.code {
            Some(code) => format!("{} ({})", error.message, code),
            None => error.message,
        }));
    }

    let text = chunk.text();
    Ok((!text.is_empty()).then_some(text))
}

/// Turn a byte stream of server-sent events into a stream of text fragments.
pub fn decode_event_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, LlmError>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<LlmError>,
{
    let state = (bytes, SseDecoder::new(), VecDeque::<Result<String, LlmError>>::new(), false);

    stream::unfold(state, |(mut bytes, mut decoder, mut pending, mut done)| async move {
        loop {
            if let Some(item) = pending.pop_front() {
                return Some((item, (bytes, decoder, pending, done)));
            }
            if done {
                return None;
            }

            match bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = decoder.push(chunk.as_ref());
                    pending.extend(events.iter().filter_map(|event| event_text(event).transpose()));
                }
                Some(Err(err)) => {
                    done = true;
                    pending.push_back(Err(err.into()));
                }
                None => {
                    done = true;
                    if let Some(event) = decoder.finish() {
                        pending.extend(event_text(&event).transpose());
                    }
                    debug!(target: TARGET_LLM_REQUEST, "Upstream event stream ended");
                }
            }
        }
    })
}
