use regex::Regex;
use std::sync::OnceLock;

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{Alphabetic}\p{N}]+").expect("word pattern is valid"))
}

/// Splits text into lowercase alphanumeric words, keeping their order.
pub fn tokenize_text(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True when the words of `phrase` appear contiguously in `text`.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let needle = tokenize_text(phrase);
    if needle.is_empty() {
        return false;
    }

    let haystack = tokenize_text(text);
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}
