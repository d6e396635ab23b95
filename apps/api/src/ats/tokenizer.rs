//! Keyword tokenizer shared by the checker, the gap analyzer and the optimizer.
//!
//! A keyword is a lowercase run that starts with an ASCII letter and continues
//! with letters, `-`, `+` or `.` (so `c++`, `node.js` and `ci-cd` survive),
//! trimmed of those punctuation characters at both ends.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "and", "or", "of", "in", "for", "on", "with", "is", "are", "as", "by",
    "be", "this", "that", "from", "at", "you", "your", "our", "we", "will", "can",
];

const EDGE_CHARS: &[char] = &['-', '+', '.'];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z][A-Za-z\-+.]+").expect("token pattern is valid"))
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn raw_tokens(lowered: &str) -> impl Iterator<Item = &str> {
    token_pattern().find_iter(lowered).map(|m| m.as_str())
}

/// Distinct keywords of `text`, alphabetically ordered.
///
/// Drops tokens of two characters or fewer (after trimming), stopwords and
/// purely numeric tokens.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    raw_tokens(&lowered)
        .map(|token| token.trim_matches(EDGE_CHARS))
        .filter(|token| {
            token.chars().count() > 2
                && !is_stopword(token)
                && !token.chars().all(char::is_numeric)
        })
        .map(str::to_string)
        .collect()
}

/// Keyword occurrence counts of `text`, most frequent first.
///
/// The length and stopword filters apply to the raw match, before trimming.
/// Ties keep first-seen order.
pub fn token_frequency(text: &str) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut ranking: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for raw in raw_tokens(&lowered) {
        if raw.chars().count() <= 2 || is_stopword(raw) {
            continue;
        }
        let token = raw.trim_matches(EDGE_CHARS);
        match positions.get(token) {
            Some(&idx) => ranking[idx].1 += 1,
            None => {
                positions.insert(token.to_string(), ranking.len());
                ranking.push((token.to_string(), 1));
            }
        }
    }

    // most frequent first, ties in first-seen order
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}

/// Lines with visible content. Splits on every line boundary (`\n`, `\r`,
/// form feed, Unicode separators) so `\r\n` and bare `\r` files count alike.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
                | '\u{2028}' | '\u{2029}'
        )
    })
    .filter(|line| !trim_blank(line).is_empty())
}

/// Whitespace as resume text treats it: Unicode whitespace plus the ASCII
/// file, group, record and unit separators.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub fn trim_blank(text: &str) -> &str {
    text.trim_matches(is_blank)
}

/// Whitespace-separated words of `text`.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_blank).filter(|word| !word.is_empty())
}

/// Rounds a percentage to two decimals, ties to even (`3.125` becomes `3.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}
