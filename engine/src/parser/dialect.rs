//! Per-dialect configuration for the shared entity assembler.
//!
//! A dialect is pure data: which markers start an item, where an item-start
//! line may carry its URL, and how the item text splits into name and
//! description. Supporting a new backend means adding a [`DialectConfig`],
//! not a new parsing routine.

use listrank_core::DialectId;

use super::classify::MarkerSet;
use super::url::UrlAnchor;

/// Separator tokens between a name and its inline description.
pub const DEFAULT_SEPARATORS: &[&str] = &[" - ", " : ", " – ", " — "];

/// How the URL-free text of an item-start line becomes name and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSplit {
    /// The whole text is the name; the description comes only from
    /// continuation lines.
    WholeText,
    /// Split at the first separator token, else at the first `.` or `-`
    /// ending a leading run, else take the whole text.
    Separators(&'static [&'static str]),
}

/// Everything that distinguishes one backend's list formatting from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    pub markers: MarkerSet,
    /// URL rule for item-start lines. Continuation lines always take the
    /// first URL anywhere.
    pub item_url: UrlAnchor,
    pub name_split: NameSplit,
}

impl DialectConfig {
    pub const PERMISSIVE_NUMBERED: DialectConfig = DialectConfig {
        markers: MarkerSet::Period,
        item_url: UrlAnchor::Anywhere,
        name_split: NameSplit::WholeText,
    };

    pub const NUMBERED_PAREN: DialectConfig = DialectConfig {
        markers: MarkerSet::PeriodOrParen,
        item_url: UrlAnchor::Trailing,
        name_split: NameSplit::Separators(DEFAULT_SEPARATORS),
    };

    pub const NUMBERED_OR_BULLETED: DialectConfig = DialectConfig {
        markers: MarkerSet::NumberedOrBullet,
        item_url: UrlAnchor::Anywhere,
        name_split: NameSplit::Separators(DEFAULT_SEPARATORS),
    };

    pub fn for_dialect(dialect: DialectId) -> &'static DialectConfig {
        match dialect {
            DialectId::PermissiveNumbered => &Self::PERMISSIVE_NUMBERED,
            DialectId::NumberedParen => &Self::NUMBERED_PAREN,
            DialectId::NumberedOrBulleted => &Self::NUMBERED_OR_BULLETED,
        }
    }

    /// Splits URL-free item text into `(name, description)`, both trimmed.
    pub fn split_name<'a>(&self, text: &'a str) -> (&'a str, &'a str) {
        match self.name_split {
            NameSplit::WholeText => (text.trim(), ""),
            NameSplit::Separators(separators) => split_on_separators(text, separators)
                .or_else(|| split_on_boundary(text))
                .unwrap_or((text.trim(), "")),
        }
    }
}

fn split_on_separators<'a>(text: &'a str, separators: &[&str]) -> Option<(&'a str, &'a str)> {
    let (idx, sep) = separators
        .iter()
        .filter_map(|sep| text.find(sep).map(|idx| (idx, *sep)))
        .min_by_key(|(idx, _)| *idx)?;
    Some((text[..idx].trim(), text[idx + sep.len()..].trim()))
}

/// First `.` or `-` that closes a non-empty leading run and is followed by
/// whitespace or the end of the text.
fn split_on_boundary(text: &str) -> Option<(&str, &str)> {
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != '.' && ch != '-' {
            continue;
        }
        // A `.` or `-` inside a word (`acme.io`, `Open-Source`) is part of the
        // name, so only one followed by whitespace or the end splits.
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        let name = text[..idx].trim();
        if at_boundary && !name.is_empty() {
            return Some((name, text[idx + ch.len_utf8()..].trim()));
        }
    }
    None
}
