//! URL detection and removal within a single line.

use regex::Regex;
use std::sync::LazyLock;

// SAFETY: compile-time constant pattern, exercised by the tests below.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"]+"#).expect("static regex must compile")
});

/// Sentence punctuation that may follow a URL without belonging to it.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];
/// Markdown emphasis and quotes closing around a URL.
const TRAILING_MARKUP: &[char] = &['*', '`', '\''];
const CLOSING_WRAPPERS: &[char] = &[')', ']', '}', '>', '"'];
const BRACKET_PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

/// Where a URL must sit for a line to yield it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlAnchor {
    /// First URL anywhere in the line.
    Anywhere,
    /// Only a URL ending the line (trailing punctuation and closing brackets
    /// allowed after it).
    Trailing,
}

/// A URL found in a line plus the line with the URL removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch {
    pub url: String,
    pub remainder: String,
}

/// Finds a URL in `text` according to `anchor`.
///
/// The remainder has the URL removed, a bracket pair wrapping exactly the URL
/// dropped, whitespace runs collapsed and ends trimmed.
pub fn extract_url(text: &str, anchor: UrlAnchor) -> Option<UrlMatch> {
    let mut spans = URL_RE.find_iter(text).filter_map(|m| {
        let url = trim_url_end(m.as_str());
        has_host(url).then_some((m.start(), m.start() + url.len()))
    });

    let (start, end) = match anchor {
        UrlAnchor::Anywhere => spans.next()?,
        UrlAnchor::Trailing => {
            let (start, end) = spans.last()?;
            if !is_trailing(&text[end..]) {
                return None;
            }
            (start, end)
        }
    };

    Some(UrlMatch {
        url: text[start..end].to_string(),
        remainder: remove_span(text, start, end),
    })
}

/// Strips punctuation, markup and closing brackets that have no opener inside
/// the URL, so `wiki/Foo_(bar)` keeps its parenthesis and `(https://a.io)`
/// loses the outer one.
fn trim_url_end(candidate: &str) -> &str {
    let mut url = candidate;
    while let Some(last) = url.chars().last() {
        let unbalanced = BRACKET_PAIRS.iter().any(|&(open, close)| {
            last == close && url.matches(close).count() > url.matches(open).count()
        });
        let strippable = unbalanced
            || TRAILING_PUNCTUATION.contains(&last)
            || TRAILING_MARKUP.contains(&last);
        if !strippable {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

fn has_host(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(_, rest)| rest.chars().any(|ch| ch.is_alphanumeric()))
}

fn is_trailing(after: &str) -> bool {
    after.chars().all(|ch| {
        ch.is_whitespace()
            || TRAILING_PUNCTUATION.contains(&ch)
            || TRAILING_MARKUP.contains(&ch)
            || CLOSING_WRAPPERS.contains(&ch)
    })
}

fn remove_span(text: &str, start: usize, end: usize) -> String {
    let mut before = &text[..start];
    let mut after = &text[end..];

    // Only a pair hugging the URL is emptied by the removal.
    for &(open, close) in BRACKET_PAIRS {
        if let (Some(head), Some(tail)) = (before.strip_suffix(open), after.strip_prefix(close)) {
            before = head;
            after = tail;
            break;
        }
    }

    // A free-standing URL takes the punctuation that closed it along.
    if before.is_empty() || before.ends_with(char::is_whitespace) {
        after = after.trim_start_matches(TRAILING_PUNCTUATION);
    }

    format!("{before}{after}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
