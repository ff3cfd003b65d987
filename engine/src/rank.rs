//! Rank resolution over parsed entities or raw response text.
//!
//! Both modes are pure: the same inputs always give the same
//! [`RankOutcome`], and a missing target is the ordinary
//! [`RankOutcome::NotMentioned`] rather than an error.

use listrank_core::{ParseResult, RankOutcome, normalize_domain};

use crate::parser::classify::is_any_item_start;
use crate::parser::normalize_line_endings;

/// Lower-cased search terms. Empty terms never match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    domain: String,
    brand: String,
}

impl SearchTerms {
    pub fn new(domain: &str, brand: &str) -> Self {
        Self {
            domain: normalize_domain(domain),
            brand: brand.trim().to_lowercase(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty() && self.brand.is_empty()
    }

    fn domain_in(&self, haystack: &str) -> bool {
        contains_term(haystack, &self.domain)
    }

    fn brand_in(&self, haystack: &str) -> bool {
        contains_term(haystack, &self.brand)
    }

    /// Either term appears in `haystack`, ignoring case.
    pub fn found_in(&self, haystack: &str) -> bool {
        let lower = haystack.to_lowercase();
        self.domain_in(&lower) || self.brand_in(&lower)
    }
}

fn contains_term(lower_haystack: &str, term: &str) -> bool {
    !term.is_empty() && lower_haystack.contains(term)
}

/// Resolves the target against parsed entities.
///
/// A name or URL match anywhere beats a description match anywhere, so the
/// entities are walked twice: first for primary matches, then for
/// description mentions.
///
/// # Examples
///
/// ```
/// use listrank_core::{Entity, ParseResult, RankOutcome};
/// use listrank_engine::resolve;
///
/// let parsed = ParseResult::new(vec![
///     Entity::new("Beta").with_description("an alternative to Acme"),
///     Entity::new("Acme Cloud"),
/// ]);
/// assert_eq!(resolve("acme.io", "Acme", &parsed), RankOutcome::Position(2));
/// ```
pub fn resolve(target_domain: &str, target_brand: &str, parsed: &ParseResult) -> RankOutcome {
    resolve_terms(&SearchTerms::new(target_domain, target_brand), parsed)
}

/// [`resolve`] with pre-built search terms.
pub fn resolve_terms(terms: &SearchTerms, parsed: &ParseResult) -> RankOutcome {
    for (idx, entity) in parsed.iter().enumerate() {
        let url = entity.url.to_lowercase();
        let name = entity.name.to_lowercase();
        if terms.domain_in(&url) || terms.brand_in(&name) || terms.domain_in(&name) {
            return RankOutcome::Position(idx + 1);
        }
    }

    if parsed.iter().any(|entity| terms.found_in(&entity.description)) {
        return RankOutcome::MentionedUnranked;
    }

    RankOutcome::NotMentioned
}

/// Resolves the target by scanning raw lines and counting item markers.
///
/// The first match on an item-start line returns that item's ordinal; a
/// match on any other line only records a pending unranked mention.
///
/// # Examples
///
/// ```
/// use listrank_core::RankOutcome;
/// use listrank_engine::resolve_raw;
///
/// let text = "Acme is popular.\n1. Beta\n2. Acme";
/// assert_eq!(resolve_raw("acme.io", "Acme", text), RankOutcome::Position(2));
/// ```
pub fn resolve_raw(target_domain: &str, target_brand: &str, raw_text: &str) -> RankOutcome {
    resolve_raw_terms(&SearchTerms::new(target_domain, target_brand), raw_text)
}

/// [`resolve_raw`] with pre-built search terms.
pub fn resolve_raw_terms(terms: &SearchTerms, raw_text: &str) -> RankOutcome {
    let mut enumerated_counter = 0usize;
    let mut mentioned = false;

    for line in normalize_line_endings(raw_text).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item_start = is_any_item_start(line);
        if item_start {
            enumerated_counter += 1;
        }
        if terms.found_in(line) {
            if item_start {
                return RankOutcome::Position(enumerated_counter);
            }
            mentioned = true;
        }
    }

    if mentioned {
        RankOutcome::MentionedUnranked
    } else {
        RankOutcome::NotMentioned
    }
}
