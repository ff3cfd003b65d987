//! Value types for parsed list responses and rank outcomes.
//!
//! Everything here is created fresh per response and never mutated after it
//! is returned. The types serialize with [`serde`] so that run results can be
//! stored as JSON/YAML and summarized later.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One recommended item extracted from a response.
///
/// `url` and `description` use the empty string to mean "absent".
///
/// # Examples
///
/// ```
/// use listrank_core::Entity;
///
/// let entity = Entity::new("Acme").with_url("https://acme.io");
/// assert_eq!(entity.name, "Acme");
/// assert!(entity.has_url());
/// assert!(entity.description.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Entity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: String::new(),
            description: String::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }

    /// Appends text to the description, joined by a single space.
    pub fn append_description(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(text);
    }
}

/// Ordered entities of one response. Index 0 is rank 1.
///
/// Duplicates are kept as distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParseResult {
    entities: Vec<Entity>,
}

impl ParseResult {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entity holding 1-based `rank`.
    pub fn at_rank(&self, rank: usize) -> Option<&Entity> {
        rank.checked_sub(1).and_then(|idx| self.entities.get(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// First `n` entities, cloned.
    pub fn sample(&self, n: usize) -> Vec<Entity> {
        self.entities.iter().take(n).cloned().collect()
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }
}

impl From<Vec<Entity>> for ParseResult {
    fn from(entities: Vec<Entity>) -> Self {
        Self::new(entities)
    }
}

impl<'a> IntoIterator for &'a ParseResult {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Formatting convention a backend tends to produce for enumerated answers.
///
/// # Examples
///
/// ```
/// use listrank_core::DialectId;
///
/// let dialect: DialectId = "numbered_paren".parse().unwrap();
/// assert_eq!(dialect, DialectId::NumberedParen);
/// assert_eq!(DialectId::default(), DialectId::NumberedOrBulleted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectId {
    /// `N.` items only; the whole item text is the name.
    PermissiveNumbered,
    /// `N.` or `N)` items with a name/description separator.
    NumberedParen,
    /// `N.`, `N)`, `*`, `-` and `•` items with a name/description separator.
    #[default]
    NumberedOrBulleted,
}

impl DialectId {
    pub const ALL: [DialectId; 3] = [
        DialectId::PermissiveNumbered,
        DialectId::NumberedParen,
        DialectId::NumberedOrBulleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissiveNumbered => "permissive_numbered",
            Self::NumberedParen => "numbered_paren",
            Self::NumberedOrBulleted => "numbered_or_bulleted",
        }
    }
}

impl fmt::Display for DialectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectId {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        DialectId::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == wanted)
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

/// Returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect '{0}'")]
pub struct UnknownDialect(pub String);

/// Where the target was found in one response.
///
/// Serialized adjacently tagged, e.g. `{"kind":"position","value":2}` or
/// `{"kind":"not_mentioned"}`.
///
/// # Examples
///
/// ```
/// use listrank_core::RankOutcome;
///
/// assert_eq!(RankOutcome::Position(3).to_string(), "#3");
/// assert_eq!(RankOutcome::MentionedUnranked.to_string(), "Mentioned (unranked)");
/// assert_eq!("Not mentioned".parse::<RankOutcome>().unwrap(), RankOutcome::NotMentioned);
/// assert!(RankOutcome::Position(1).is_top(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RankOutcome {
    /// Primary (name or URL) match at this 1-based position.
    Position(usize),
    /// Found only in descriptive or non-enumerated text.
    MentionedUnranked,
    NotMentioned,
    /// The backend call failed; carries the failure reason.
    Error(String),
}

impl RankOutcome {
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Position(n) => Some(*n),
            _ => None,
        }
    }

    /// `true` for a ranked position or an unranked mention.
    pub fn is_mentioned(&self) -> bool {
        matches!(self, Self::Position(_) | Self::MentionedUnranked)
    }

    /// `true` when ranked at or above `threshold` (1 is the top).
    pub fn is_top(&self, threshold: usize) -> bool {
        self.position().is_some_and(|n| n <= threshold)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for RankOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(n) => write!(f, "#{n}"),
            Self::MentionedUnranked => write!(f, "Mentioned (unranked)"),
            Self::NotMentioned => write!(f, "Not mentioned"),
            Self::Error(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// Returned when a label does not match any [`RankOutcome`] display form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized rank outcome '{0}'")]
pub struct OutcomeParseError(pub String);

impl FromStr for RankOutcome {
    type Err = OutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(reason) = trimmed.strip_prefix("Error:") {
            return Ok(Self::Error(reason.trim().to_string()));
        }
        match trimmed {
            "Mentioned (unranked)" => return Ok(Self::MentionedUnranked),
            "Not mentioned" => return Ok(Self::NotMentioned),
            _ => {}
        }
        trimmed
            .strip_prefix('#')
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .map(Self::Position)
            .ok_or_else(|| OutcomeParseError(s.to_string()))
    }
}

/// Which resolution mode produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Walked the parsed entity sequence.
    Structured,
    /// Walked the raw text lines directly.
    RawLine,
}

/// Line accounting for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-blank lines seen.
    pub relevant_lines: usize,
    /// Lines that started a new entity.
    pub item_lines: usize,
    /// Lines appended to an entity in progress.
    pub continuation_lines: usize,
    /// Lines dropped because no entity had started yet.
    pub orphan_lines: usize,
}

impl ParseStats {
    /// Share of relevant lines attached to some entity.
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        (self.item_lines + self.continuation_lines) as f64 / self.relevant_lines as f64
    }
}

/// The domain and brand being looked for.
///
/// # Examples
///
/// ```
/// use listrank_core::Target;
///
/// let target = Target::from_domain("https://www.neosync.dev");
/// assert_eq!(target.domain, "neosync.dev");
/// assert_eq!(target.brand, "Neosync");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub domain: String,
    pub brand: String,
}

impl Target {
    pub fn new(domain: &str, brand: &str) -> Self {
        Self {
            domain: normalize_domain(domain),
            brand: brand.trim().to_string(),
        }
    }

    /// Builds a target whose brand is the capitalized first domain label.
    pub fn from_domain(domain: &str) -> Self {
        let domain = normalize_domain(domain);
        let brand = derive_brand(&domain);
        Self { domain, brand }
    }

    /// Uses `brand` when given and non-blank, otherwise derives it from the domain.
    pub fn with_optional_brand(domain: &str, brand: Option<&str>) -> Self {
        match brand.map(str::trim).filter(|b| !b.is_empty()) {
            Some(brand) => Self::new(domain, brand),
            None => Self::from_domain(domain),
        }
    }
}

/// Lower-cases a domain and strips a leading scheme, a leading `www.` and
/// trailing slashes. Applying it twice gives the same result.
///
/// # Examples
///
/// ```
/// use listrank_core::normalize_domain;
///
/// assert_eq!(normalize_domain("HTTPS://www.Acme.io/"), "acme.io");
/// assert_eq!(normalize_domain("acme.io"), "acme.io");
/// ```
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().to_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}

/// Capitalized first label of a normalized domain (`neosync.dev` → `Neosync`).
pub fn derive_brand(domain: &str) -> String {
    let normalized = normalize_domain(domain);
    let label = normalized.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Per backend, per prompt record handed to report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub backend: String,
    pub prompt: String,
    pub rank: RankOutcome,
    /// `None` when the backend call failed before anything was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ResolutionMode>,
    /// Leading characters of the response, `...` appended when cut.
    pub raw_text_preview: String,
    /// First few parsed entities.
    #[serde(default)]
    pub sample_entities: Vec<Entity>,
    #[serde(default)]
    pub entity_count: usize,
    #[serde(default)]
    pub stats: ParseStats,
}

impl QueryRecord {
    /// Record for a failed backend call.
    pub fn failed(backend: &str, prompt: &str, reason: &str) -> Self {
        Self {
            backend: backend.to_string(),
            prompt: prompt.to_string(),
            rank: RankOutcome::Error(reason.to_string()),
            mode: None,
            raw_text_preview: format!("Error: {reason}"),
            sample_entities: Vec::new(),
            entity_count: 0,
            stats: ParseStats::default(),
        }
    }
}

/// Cuts `text` to at most `max_chars` characters, appending `...` when cut.
///
/// # Examples
///
/// ```
/// use listrank_core::preview;
///
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("abcdef", 3), "abc...");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
