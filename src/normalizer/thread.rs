//! Decoding of twitter-thread output, which the model does not reliably
//! return in one shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Two or more newlines in a row, allowing blank lines that hold spaces or tabs.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("paragraph break pattern is valid")
});

/// `1/4` or the bare `1/` numbering form.
static TWEET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})/(\d{1,3})?").expect("tweet marker pattern is valid"));

/// Which step of the cascade produced the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStrategy {
    Structured,
    Paragraphs,
    Numbered,
    Lines,
}

impl fmt::Display for ThreadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreadStrategy::Structured => "structured",
            ThreadStrategy::Paragraphs => "paragraphs",
            ThreadStrategy::Numbered => "numbered",
            ThreadStrategy::Lines => "lines",
        };
        f.write_str(name)
    }
}

type Strategy = fn(&str) -> Option<Vec<String>>;

/// Tried in order; the first strategy that yields tweets wins.
const CASCADE: [(ThreadStrategy, Strategy); 4] = [
    (ThreadStrategy::Structured, structured),
    (ThreadStrategy::Paragraphs, paragraphs),
    (ThreadStrategy::Numbered, numbered),
    (ThreadStrategy::Lines, lines),
];

/// Schema the thread prompt asks for, plus the shapes models also produce:
/// a bare array, or an object whose only array field is named something else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThreadPayload {
    Keyed {
        #[serde(alias = "tweets", alias = "thread")]
        twitter_thread: Vec<TweetItem>,
    },
    Bare(Vec<TweetItem>),
    Fields(BTreeMap<String, FieldValue>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Items(Vec<TweetItem>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TweetItem {
    Text(String),
    Object {
        #[serde(alias = "content")]
        text: String,
    },
}

impl ThreadPayload {
    fn into_texts(self) -> Vec<String> {
        let items = match self {
            ThreadPayload::Keyed { twitter_thread } => twitter_thread,
            ThreadPayload::Bare(items) => items,
            ThreadPayload::Fields(fields) => sole_sequence(fields),
        };
        items
            .into_iter()
            .map(|item| match item {
                TweetItem::Text(text) => text,
                TweetItem::Object { text } => text,
            })
            .collect()
    }
}

/// Items of the one sequence-valued field; nothing when there are none or several.
fn sole_sequence(fields: BTreeMap<String, FieldValue>) -> Vec<TweetItem> {
    let mut sequences = fields.into_values().filter_map(|value| match value {
        FieldValue::Items(items) => Some(items),
        FieldValue::Other(_) => None,
    });
    match (sequences.next(), sequences.next()) {
        (Some(items), None) => items,
        _ => Vec::new(),
    }
}

/// Run the cascade over already-cleaned text.
pub fn decode_thread(text: &str) -> Option<(ThreadStrategy, Vec<String>)> {
    CASCADE
        .iter()
        .find_map(|(strategy, decode)| decode(text).map(|tweets| (*strategy, tweets)))
}

/// Text that is JSON on its own is judged as a whole; only prose gets searched
/// for an embedded payload.
fn structured(text: &str) -> Option<Vec<String>> {
    if serde_json::from_str::<IgnoredAny>(text).is_ok() {
        return decode_payload(text);
    }
    embedded_json(text).find_map(decode_payload)
}

fn decode_payload(text: &str) -> Option<Vec<String>> {
    let payload: ThreadPayload = serde_json::from_str(text).ok()?;
    segments(payload.into_texts().iter().map(String::as_str))
}

/// Candidate `{...}` or `[...]` spans for JSON wrapped in prose, one per
/// opening bracket, each running to the last matching close.
fn embedded_json(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.match_indices(['{', '[']).filter_map(move |(start, open)| {
        let close = if open == "{" { '}' } else { ']' };
        let end = text.rfind(close)?;
        (end > start).then(|| &text[start..=end])
    })
}

fn paragraphs(text: &str) -> Option<Vec<String>> {
    segments(PARAGRAPH_BREAK.split(text)).filter(|tweets| tweets.len() > 1)
}

/// Spans starting at `1/n`, `2/n`, ... markers. Markers must stand alone
/// between whitespace and count up from one, so fractions inside prose are
/// left alone.
fn numbered(text: &str) -> Option<Vec<String>> {
    let mut starts: Vec<usize> = Vec::new();

    for caps in TWEET_MARKER.captures_iter(text) {
        let (Some(marker), Some(index)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !stands_alone(text, marker.start(), marker.end()) {
            continue;
        }
        let Ok(index) = index.as_str().parse::<usize>() else {
            continue;
        };
        let total = caps.get(2).and_then(|t| t.as_str().parse::<usize>().ok());
        if total.is_some_and(|total| index > total) {
            continue;
        }
        if index == starts.len() + 1 {
            starts.push(marker.start());
        }
    }

    if starts.len() < 2 {
        return None;
    }

    let spans = starts.iter().enumerate().map(|(i, &start)| {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        &text[start..end]
    });
    segments(spans)
}

fn stands_alone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    let after = text[end..].chars().next().map_or(true, char::is_whitespace);
    before && after
}

fn lines(text: &str) -> Option<Vec<String>> {
    segments(text.lines())
}

/// Trimmed, non-empty pieces; `None` when nothing survives.
fn segments<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Option<Vec<String>> {
    let tweets: Vec<String> = pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();
    (!tweets.is_empty()).then_some(tweets)
}
