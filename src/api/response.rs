//! JSON bodies returned by the summarize endpoint.

use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::NormalizedResult;

/// Where a decoded thread lands in the response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThreadShape {
    /// `{"summaries": {"twitter_thread": [...]}}`, consistent with other formats.
    #[default]
    Keyed,
    /// `{"summaries": [...]}`, kept for callers of the first API revision.
    Legacy,
}

impl FromStr for ThreadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyed" => Ok(ThreadShape::Keyed),
            "legacy" => Ok(ThreadShape::Legacy),
            other => Err(format!(
                "unknown thread response shape '{}', expected 'keyed' or 'legacy'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResponse {
    pub summaries: Summaries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summaries {
    Keyed(BTreeMap<String, SummaryValue>),
    Flat(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Text(String),
    Thread(Vec<String>),
}

impl SummaryResponse {
    pub fn from_result(result: NormalizedResult, shape: ThreadShape) -> Self {
        let key = result.format().as_str().to_string();
        let summaries = match (result, shape) {
            (NormalizedResult::Thread(tweets), ThreadShape::Legacy) => Summaries::Flat(tweets),
            (NormalizedResult::Thread(tweets), ThreadShape::Keyed) => {
                Summaries::Keyed(BTreeMap::from([(key, SummaryValue::Thread(tweets))]))
            }
            (NormalizedResult::Text { text, .. }, _) => {
                Summaries::Keyed(BTreeMap::from([(key, SummaryValue::Text(text))]))
            }
        };
        Self { summaries }
    }
}
