use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Characters that are not whitespace to the regex engine but show up as
/// invisible separators in scraped text.
const INVISIBLE_SEPARATORS: [char; 2] = ['\u{200B}', '\u{FEFF}'];

/// Flatten free text onto one line: invisible separators become spaces,
/// every whitespace run collapses to a single space, and the ends are trimmed.
pub fn clean_text(raw: &str) -> String {
    let spaced = raw.replace(INVISIBLE_SEPARATORS, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// [`clean_text`] for an untyped cell; non-strings clean to the empty string.
pub fn clean_text_value(raw: &Value) -> String {
    match raw {
        Value::String(s) => clean_text(s),
        _ => String::new(),
    }
}
