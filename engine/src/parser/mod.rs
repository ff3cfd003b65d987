//! List-response parser for multiple backend dialects.
//!
//! Text-generation backends enumerate recommendations in slightly different
//! ways:
//!
//! - **Permissive numbered** — `1.` items, URL anywhere on the item line,
//!   the whole item text is the name.
//! - **Numbered with period or paren** — `1.` / `1)` items, URL only when it
//!   ends the item line, `Name - description` splitting.
//! - **Numbered or bulleted** — `1.`, `1)`, `*`, `-`, `•` items with
//!   `Name - description` splitting.
//!
//! # Architecture
//!
//! Every dialect runs the same pipeline. Each trimmed, non-blank line is
//! classified against the dialect's marker set ([`classify`]); item-start
//! lines open a new entity and continuation lines extend the open one
//! ([`assembler`]). URLs are pulled out of lines by [`url`]. The differences
//! between dialects live entirely in [`DialectConfig`].
//!
//! Parsing never fails. Text with no recognizable items yields an empty
//! [`ParseResult`], which callers treat as the signal to fall back to
//! raw-line rank resolution.

mod assembler;
pub mod classify;
pub mod dialect;
pub mod url;

use listrank_core::{DialectId, ParseResult, ParseStats};
use tracing::debug;

pub use dialect::DialectConfig;

use assembler::EntityAssembler;

/// Parser bound to one dialect configuration.
#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    config: DialectConfig,
}

impl ResponseParser {
    pub fn new(dialect: DialectId) -> Self {
        Self {
            config: *DialectConfig::for_dialect(dialect),
        }
    }

    /// Uses a custom configuration, e.g. for a backend with its own markers.
    pub fn with_config(config: DialectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    pub fn parse(&self, raw_text: &str) -> ParseResult {
        self.parse_with_stats(raw_text).0
    }

    /// Parses and reports how the lines were used.
    pub fn parse_with_stats(&self, raw_text: &str) -> (ParseResult, ParseStats) {
        let normalized = normalize_line_endings(raw_text);
        let mut assembler = EntityAssembler::new(&self.config);
        for line in normalized.lines() {
            assembler.feed(line);
        }
        let (result, stats) = assembler.finish();

        debug!(
            entities = result.len(),
            relevant = stats.relevant_lines,
            items = stats.item_lines,
            continuations = stats.continuation_lines,
            orphans = stats.orphan_lines,
            markers = ?self.config.markers,
            "parsed list response"
        );
        (result, stats)
    }
}

/// Turns `\r\n` and lone `\r` into `\n`.
pub(crate) fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "Here are the best options:\n\
        \n\
        1. Acme - widgets https://acme.io\n\
        2) Beta - gadgets\n\
        * Gamma - gizmos\n\
        \n\
        Let me know if you need more.";

    #[test]
    fn test_dialects_differ_only_in_marker_sets() {
        let permissive = ResponseParser::new(DialectId::PermissiveNumbered).parse(MIXED);
        let paren = ResponseParser::new(DialectId::NumberedParen).parse(MIXED);
        let bulleted = ResponseParser::new(DialectId::NumberedOrBulleted).parse(MIXED);

        assert_eq!(permissive.len(), 1);
        assert_eq!(paren.len(), 2);
        assert_eq!(bulleted.len(), 3);
    }

    #[test]
    fn test_permissive_absorbs_unrecognized_items_as_description() {
        let result = ResponseParser::new(DialectId::PermissiveNumbered).parse(MIXED);
        let acme = &result.entities()[0];
        assert_eq!(acme.name, "Acme - widgets");
        assert_eq!(acme.url, "https://acme.io");
        assert_eq!(
            acme.description,
            "2) Beta - gadgets * Gamma - gizmos Let me know if you need more."
        );
    }

    #[test]
    fn test_carriage_returns_are_line_breaks() {
        let result =
            ResponseParser::new(DialectId::NumberedParen).parse("1) Acme\r\n2) Beta\r3) Gamma");
        let names: Vec<&str> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
    }

    #[test]
    fn test_stats_account_for_every_line() {
        let (_, stats) =
            ResponseParser::new(DialectId::NumberedOrBulleted).parse_with_stats(MIXED);
        assert_eq!(stats.relevant_lines, 5);
        assert_eq!(stats.item_lines, 3);
        assert_eq!(stats.continuation_lines, 1);
        assert_eq!(stats.orphan_lines, 1);
        assert!((stats.coverage() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = ResponseParser::new(DialectId::NumberedOrBulleted);
        assert_eq!(parser.parse(MIXED), parser.parse(MIXED));
    }

    #[test]
    fn test_custom_config() {
        let config = DialectConfig {
            markers: classify::MarkerSet::NumberedOrBullet,
            item_url: url::UrlAnchor::Trailing,
            name_split: dialect::NameSplit::WholeText,
        };
        let result =
            ResponseParser::with_config(config).parse("• Acme - widgets https://acme.io");
        assert_eq!(result.entities()[0].name, "Acme - widgets");
        assert_eq!(result.entities()[0].url, "https://acme.io");
    }
}
