//! Upstream text generation.
//!
//! The summarize handler only needs an ordered stream of text fragments, so
//! the provider sits behind [`TextGenerator`]. [`GeminiClient`] is the
//! production implementation.

mod gemini;
mod sse;
mod types;

pub use self::gemini::GeminiClient;
pub use self::sse::{decode_event_stream, SseDecoder};
pub use self::types::*;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::error::LlmError;
use crate::TARGET_LLM_REQUEST;

/// A source of generated text, delivered as fragments in arrival order.
pub trait TextGenerator: Send + Sync {
    fn stream_text(&self, prompt: String) -> BoxStream<'static, Result<String, LlmError>>;
}

/// Drain every fragment, in order, into one string.
///
/// The first stream error aborts the whole generation.
pub async fn collect_text<S>(mut fragments: S) -> Result<String, LlmError>
where
    S: Stream<Item = Result<String, LlmError>> + Unpin,
{
    let mut text = String::new();
    let mut count = 0usize;

    while let Some(fragment) = fragments.next().await {
        text.push_str(&fragment?);
        count += 1;
    }

    debug!(
        target: TARGET_LLM_REQUEST,
        "Collected {} fragments ({} bytes) from upstream", count, text.len()
    );
    Ok(text)
}
