//! Response normalizer.
//!
//! Turns the concatenated model output for a requested [`Format`] into a typed
//! result: one cleaned string for prose formats, or an ordered list of tweets
//! for `twitter_thread`.

mod cleanup;
mod thread;

pub use self::cleanup::clean;
pub use self::thread::{decode_thread, ThreadStrategy};

use tracing::{debug, warn};

use crate::error::NormalizeError;
use crate::{Format, TARGET_NORMALIZER};

/// Normalized model output, shaped by the requested format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResult {
    Text { format: Format, text: String },
    Thread(Vec<String>),
}

impl NormalizedResult {
    pub fn format(&self) -> Format {
        match self {
            NormalizedResult::Text { format, .. } => *format,
            NormalizedResult::Thread(_) => Format::TwitterThread,
        }
    }
}

/// Clean `raw` and shape it for `format`.
///
/// Only `twitter_thread` can fail, when no decoding strategy yields a tweet.
/// The error carries the cleaned text so callers can report it.
pub fn normalize(raw: &str, format: Format) -> Result<NormalizedResult, NormalizeError> {
    let cleaned = clean(raw);

    match format {
        Format::Abstract | Format::LinkedinPost => Ok(NormalizedResult::Text {
            format,
            text: cleaned,
        }),
        Format::TwitterThread => match decode_thread(&cleaned) {
            Some((strategy, tweets)) => {
                debug!(
                    target: TARGET_NORMALIZER,
                    "Decoded {} tweets using the {} strategy",
                    tweets.len(),
                    strategy
                );
                Ok(NormalizedResult::Thread(tweets))
            }
            None => {
                warn!(
                    target: TARGET_NORMALIZER,
                    "No strategy could split model output into a thread ({} bytes)",
                    cleaned.len()
                );
                Err(NormalizeError::MalformedModelOutput { raw: cleaned })
            }
        },
    }
}
