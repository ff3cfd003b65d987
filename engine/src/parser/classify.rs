//! Line classification against a dialect's accepted item markers.

use regex::Regex;
use std::sync::LazyLock;

// SAFETY: These regexes are compile-time constants and are validated by tests.
static PERIOD_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("static regex must compile"));
static PERIOD_OR_PAREN_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").expect("static regex must compile"));
static BULLET_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*\-•]\s+(.*)$").expect("static regex must compile"));

/// Item markers a dialect recognizes at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSet {
    /// `1.` only.
    Period,
    /// `1.` or `1)`.
    PeriodOrParen,
    /// `1.`, `1)`, `*`, `-` or `•`.
    NumberedOrBullet,
}

impl MarkerSet {
    fn accepts_paren(&self) -> bool {
        !matches!(self, Self::Period)
    }

    fn accepts_bullets(&self) -> bool {
        matches!(self, Self::NumberedOrBullet)
    }
}

/// Classification of one trimmed, non-blank line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Starts with a number marker; carries the text after the marker.
    Enumerated(&'a str),
    /// Starts with a bullet glyph; carries the text after the glyph.
    Bulleted(&'a str),
    /// Anything else; carries the whole line.
    Continuation(&'a str),
}

impl<'a> LineKind<'a> {
    pub fn is_item_start(&self) -> bool {
        !matches!(self, Self::Continuation(_))
    }

    pub fn text(&self) -> &'a str {
        match self {
            Self::Enumerated(text) | Self::Bulleted(text) | Self::Continuation(text) => text,
        }
    }
}

/// Classifies `line` under `markers`. The caller trims and skips blank lines.
pub fn classify_line(line: &str, markers: MarkerSet) -> LineKind<'_> {
    let numbered = if markers.accepts_paren() {
        &*PERIOD_OR_PAREN_ITEM_RE
    } else {
        &*PERIOD_ITEM_RE
    };

    if let Some(text) = capture_text(numbered, line) {
        return LineKind::Enumerated(text);
    }
    if markers.accepts_bullets() {
        if let Some(text) = capture_text(&BULLET_ITEM_RE, line) {
            return LineKind::Bulleted(text);
        }
    }
    LineKind::Continuation(line)
}

/// `true` when `line` starts an item under the broadest marker set.
pub fn is_any_item_start(line: &str) -> bool {
    classify_line(line, MarkerSet::NumberedOrBullet).is_item_start()
}

fn capture_text<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
