//! Pull a JSON value out of free-form completion text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::AiError;

/// A ```` ```json ```` fenced block; the body is captured lazily so a reply
/// with several blocks yields the first one.
static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*\n(.*?)\n\s*```").expect("valid regex"));

/// Everything from the first `{` to the last `}`.
static BRACED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Locate the JSON candidate inside `text`.
///
/// Tries a fenced `json` block first, then the outermost brace span, then
/// the whole text.
pub fn json_candidate(text: &str) -> &str {
    if let Some(body) = FENCED_JSON_RE.captures(text).and_then(|c| c.get(1)) {
        return body.as_str();
    }
    if let Some(span) = BRACED_RE.find(text) {
        return span.as_str();
    }
    text
}

/// Parse the JSON embedded in a completion.
pub fn parse_json(text: &str) -> Result<Value, AiError> {
    serde_json::from_str(json_candidate(text)).map_err(|e| AiError::Parse(e.to_string()))
}
