//! Shared accumulation state machine used by every dialect.

use listrank_core::{Entity, ParseResult, ParseStats};
use tracing::trace;

use super::classify::{LineKind, classify_line};
use super::dialect::DialectConfig;
use super::url::{UrlAnchor, extract_url};

/// Markdown emphasis wrapped around names (`**Acme**`, `_Acme_`, `` `acme` ``).
const EMPHASIS: &[char] = &['*', '_', '`'];

enum State {
    Idle,
    Building(Entity),
}

/// Builds entities line by line. An entity reaches the output only when the
/// next item starts or [`finish`](EntityAssembler::finish) is called.
pub(crate) struct EntityAssembler<'c> {
    config: &'c DialectConfig,
    state: State,
    entities: Vec<Entity>,
    stats: ParseStats,
}

impl<'c> EntityAssembler<'c> {
    pub(crate) fn new(config: &'c DialectConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            entities: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Consumes one raw line. Blank lines are ignored.
    pub(crate) fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.stats.relevant_lines += 1;

        match classify_line(line, self.config.markers) {
            LineKind::Enumerated(text) | LineKind::Bulleted(text) => self.start_item(text),
            LineKind::Continuation(text) => self.continue_item(text),
        }
    }

    pub(crate) fn finish(mut self) -> (ParseResult, ParseStats) {
        self.finalize_current();
        (ParseResult::new(self.entities), self.stats)
    }

    fn start_item(&mut self, text: &str) {
        self.finalize_current();
        self.stats.item_lines += 1;

        let (url, rest) = match extract_url(text, self.config.item_url) {
            Some(found) => (found.url, found.remainder),
            None => (String::new(), text.to_string()),
        };
        let (name, description) = self.config.split_name(&rest);

        self.state = State::Building(Entity {
            name: clean_name(name),
            url,
            description: description.to_string(),
        });
    }

    fn continue_item(&mut self, text: &str) {
        let State::Building(entity) = &mut self.state else {
            self.stats.orphan_lines += 1;
            trace!(line = text, "discarding line before first item");
            return;
        };

        self.stats.continuation_lines += 1;
        if entity.has_url() {
            entity.append_description(text);
            return;
        }
        match extract_url(text, UrlAnchor::Anywhere) {
            Some(found) => {
                entity.url = found.url;
                entity.append_description(&found.remainder);
            }
            None => entity.append_description(text),
        }
    }

    fn finalize_current(&mut self) {
        if let State::Building(entity) = std::mem::replace(&mut self.state, State::Idle) {
            self.entities.push(entity);
        }
    }
}

fn clean_name(name: &str) -> String {
    let name = name.trim().trim_end_matches(':').trim_matches(EMPHASIS).trim();
    // Markdown link text left behind once the link target is taken.
    let name = name
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(name);
    name.trim_matches(EMPHASIS)
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(config: &DialectConfig, text: &str) -> (ParseResult, ParseStats) {
        let mut assembler = EntityAssembler::new(config);
        for line in text.lines() {
            assembler.feed(line);
        }
        assembler.finish()
    }

    #[test]
    fn test_entity_finalized_only_on_next_item_or_end() {
        let mut assembler = EntityAssembler::new(&DialectConfig::PERMISSIVE_NUMBERED);
        assembler.feed("1. Acme");
        assert!(assembler.entities.is_empty());
        assembler.feed("2. Beta");
        assert_eq!(assembler.entities.len(), 1);
        let (result, _) = assembler.finish();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_continuations_accumulate_description() {
        let (result, stats) = assemble(
            &DialectConfig::PERMISSIVE_NUMBERED,
            "1. Acme\n   Builds widgets.\n\n   Fast and cheap.\n2. Beta",
        );
        assert_eq!(result.entities()[0].description, "Builds widgets. Fast and cheap.");
        assert_eq!(result.entities()[1].description, "");
        assert_eq!(stats.item_lines, 2);
        assert_eq!(stats.continuation_lines, 2);
        assert_eq!(stats.relevant_lines, 4);
    }

    #[test]
    fn test_first_continuation_url_wins() {
        let (result, _) = assemble(
            &DialectConfig::PERMISSIVE_NUMBERED,
            "1. Acme\nWebsite https://acme.io\nMirror https://mirror.acme.io",
        );
        let acme = &result.entities()[0];
        assert_eq!(acme.url, "https://acme.io");
        assert_eq!(acme.description, "Website Mirror https://mirror.acme.io");
    }

    #[test]
    fn test_item_url_blocks_continuation_url() {
        let (result, _) = assemble(
            &DialectConfig::PERMISSIVE_NUMBERED,
            "1. Acme https://acme.io\nSee also https://docs.acme.io",
        );
        let acme = &result.entities()[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.url, "https://acme.io");
        assert_eq!(acme.description, "See also https://docs.acme.io");
    }

    #[test]
    fn test_orphan_lines_before_first_item_are_dropped() {
        let (result, stats) = assemble(
            &DialectConfig::NUMBERED_OR_BULLETED,
            "Here are some tools:\n* Acme - widgets",
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.entities()[0].description, "widgets");
        assert_eq!(stats.orphan_lines, 1);
    }

    #[test]
    fn test_empty_name_is_still_finalized() {
        let (result, _) = assemble(
            &DialectConfig::PERMISSIVE_NUMBERED,
            "1. https://acme.io\n2. Beta",
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.entities()[0].name, "");
        assert_eq!(result.entities()[0].url, "https://acme.io");
    }

    #[test]
    fn test_trailing_anchor_leaves_mid_line_url_in_text() {
        let (result, _) = assemble(
            &DialectConfig::NUMBERED_PAREN,
            "1) Acme - see https://acme.io/pricing for plans",
        );
        let acme = &result.entities()[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.url, "");
        assert_eq!(acme.description, "see https://acme.io/pricing for plans");
    }

    #[test]
    fn test_markdown_emphasis_stripped_from_name() {
        let (result, _) = assemble(
            &DialectConfig::NUMBERED_OR_BULLETED,
            "1. **Acme** - widgets\n2. __Beta__ — gadgets",
        );
        assert_eq!(result.entities()[0].name, "Acme");
        assert_eq!(result.entities()[1].name, "Beta");
        assert_eq!(result.entities()[1].description, "gadgets");
    }

    #[test]
    fn test_clean_name_variants() {
        assert_eq!(clean_name("**Acme**:"), "Acme");
        assert_eq!(clean_name("**Acme:**"), "Acme");
        assert_eq!(clean_name("`acme-cli`"), "acme-cli");
        assert_eq!(clean_name("  "), "");
        assert_eq!(clean_name("**[Acme]**"), "Acme");
        assert_eq!(clean_name("[**Acme**]"), "Acme");
        assert_eq!(clean_name("[1] Acme"), "[1] Acme");
    }

    #[test]
    fn test_markdown_link_name_loses_brackets() {
        let (result, _) = assemble(
            &DialectConfig::NUMBERED_OR_BULLETED,
            "1. [Acme](https://acme.io/docs) - widgets\n2. **[Beta](https://beta.io)**",
        );
        let acme = &result.entities()[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.url, "https://acme.io/docs");
        assert_eq!(acme.description, "widgets");

        let beta = &result.entities()[1];
        assert_eq!(beta.name, "Beta");
        assert_eq!(beta.url, "https://beta.io");
    }

    #[test]
    fn test_repeated_items_stay_separate_entities() {
        let (result, stats) = assemble(&DialectConfig::PERMISSIVE_NUMBERED, "1. Acme\n2. Acme");
        assert_eq!(result.len(), 2);
        assert_eq!(result.entities()[0], result.entities()[1]);
        assert_eq!(stats.item_lines, 2);
    }
}
