//! YAML configuration for rank runs.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! target:
//!   domain: https://www.neosync.dev
//!   brand: Neosync
//! throttle_ms: 500
//! preview_chars: 500
//! sample_entities: 3
//! top_rank_threshold: 3
//! dialects:
//!   default: numbered_or_bulleted
//!   backends:
//!     openai: permissive_numbered
//!     claude: numbered_paren
//!     perplexity: numbered_or_bulleted
//! ```
//!
//! Everything except `version` and `target.domain` may be omitted.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use listrank_core::{DEFAULT_TOP_RANK_THRESHOLD, DialectId, Target};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::workflow::{DEFAULT_SYSTEM_PROMPT, RunConfig};

/// Pause between two calls to the same backend.
pub const DEFAULT_THROTTLE_MS: u64 = 500;
/// Characters of each response kept in a query record.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;
/// Parsed entities kept in a query record.
pub const DEFAULT_SAMPLE_ENTITIES: usize = 3;

/// The site being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Domain, with or without scheme and `www.`.
    pub domain: String,
    /// Brand name; derived from the domain when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl TargetConfig {
    pub fn target(&self) -> Target {
        Target::with_optional_brand(&self.domain, self.brand.as_deref())
    }
}

/// Maps backend identities to list dialects.
///
/// Backend names match case-insensitively; unknown backends get `default`.
///
/// # Examples
///
/// ```
/// use listrank_core::DialectId;
/// use listrank_engine::DialectSelector;
///
/// let selector = DialectSelector::default();
/// assert_eq!(selector.select("OpenAI"), DialectId::PermissiveNumbered);
/// assert_eq!(selector.select("some-new-model"), DialectId::NumberedOrBulleted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectSelector {
    pub default: DialectId,
    pub backends: BTreeMap<String, DialectId>,
}

impl Default for DialectSelector {
    fn default() -> Self {
        let backends = [
            ("openai", DialectId::PermissiveNumbered),
            ("claude", DialectId::NumberedParen),
            ("perplexity", DialectId::NumberedOrBulleted),
        ]
        .into_iter()
        .map(|(name, dialect)| (name.to_string(), dialect))
        .collect();

        Self {
            default: DialectId::NumberedOrBulleted,
            backends,
        }
    }
}

impl DialectSelector {
    pub fn select(&self, backend: &str) -> DialectId {
        let backend = backend.trim();
        self.backends
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(backend))
            .map(|(_, dialect)| *dialect)
            .unwrap_or(self.default)
    }

    /// Adds or replaces one backend mapping.
    pub fn with_backend(mut self, backend: &str, dialect: DialectId) -> Self {
        self.backends.insert(backend.trim().to_ascii_lowercase(), dialect);
        self
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Configuration format version (e.g. `"1.0"`).
    pub version: String,
    pub target: TargetConfig,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_sample_entities")]
    pub sample_entities: usize,
    #[serde(default = "default_top_rank_threshold")]
    pub top_rank_threshold: usize,
    #[serde(default)]
    pub dialects: DialectSelector,
}

fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_MS
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

fn default_sample_entities() -> usize {
    DEFAULT_SAMPLE_ENTITIES
}

fn default_top_rank_threshold() -> usize {
    DEFAULT_TOP_RANK_THRESHOLD
}

impl RankConfig {
    /// Configuration with defaults for everything but the target domain.
    pub fn new(domain: &str) -> Self {
        Self {
            version: "1.0".to_string(),
            target: TargetConfig {
                domain: domain.to_string(),
                brand: None,
            },
            throttle_ms: DEFAULT_THROTTLE_MS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            sample_entities: DEFAULT_SAMPLE_ENTITIES,
            top_rank_threshold: DEFAULT_TOP_RANK_THRESHOLD,
            dialects: DialectSelector::default(),
        }
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be read,
    /// [`Yaml`](ConfigError::Yaml) if parsing fails, or
    /// [`Invalid`](ConfigError::Invalid) if [`validate`](Self::validate)
    /// rejects the values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.target().domain.is_empty() {
            return Err(ConfigError::Invalid("target.domain must not be empty".to_string()));
        }
        if self.preview_chars == 0 {
            return Err(ConfigError::Invalid("preview_chars must be at least 1".to_string()));
        }
        if self.top_rank_threshold == 0 {
            return Err(ConfigError::Invalid(
                "top_rank_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn target(&self) -> Target {
        self.target.target()
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            target: self.target(),
            throttle: self.throttle(),
            preview_chars: self.preview_chars,
            sample_entities: self.sample_entities,
            dialects: self.dialects.clone(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
