//! Generic cleanup applied to model output before any format-specific shaping.

use once_cell::sync::Lazy;
use regex::Regex;

/// A leading `Summary:` label, bare or wrapped in `*`/`_` emphasis.
static SUMMARY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[*_]{1,2}summary(?::[*_]{0,2}|[*_]{1,2}:?)|summary:)\s*")
        .expect("summary label pattern is valid")
});

/// Opening fence tagged with a language, with the newline that follows it.
/// A `json` tag may run straight into the content; any other tag must end the line.
static TAGGED_FENCE_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:json[ \t]*\r?\n?|[a-z][\w+.-]*[ \t]*\r?\n)")
        .expect("fenced opener pattern is valid")
});

const FENCE: &str = "```";

/// Strip the label, every code fence marker, and surrounding whitespace.
///
/// Passes repeat until nothing changes, so a label that only surfaces once a
/// fence is gone is stripped too and cleaning cleaned text is a no-op.
pub fn clean(raw: &str) -> String {
    let mut text = clean_once(raw);
    loop {
        let next = clean_once(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn clean_once(text: &str) -> String {
    let unlabeled = SUMMARY_LABEL.replace(text, "");
    let unfenced = TAGGED_FENCE_OPEN.replace_all(&unlabeled, "");
    unfenced.replace(FENCE, "").trim().to_string()
}
