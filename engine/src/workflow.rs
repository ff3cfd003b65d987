//! Query orchestration: send prompts to backends, parse each response, and
//! resolve the target's rank.
//!
//! Backends run in parallel, one rayon task each. Prompts for a single
//! backend run sequentially with a throttle delay between calls. A failed
//! call becomes a [`RankOutcome::Error`] record for that prompt only.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use listrank_core::{
    DialectId, ParseResult, ParseStats, QueryRecord, RankOutcome, ResolutionMode, RunSummary,
    Target, preview, summarize_records,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{
    DEFAULT_PREVIEW_CHARS, DEFAULT_SAMPLE_ENTITIES, DEFAULT_THROTTLE_MS, DialectSelector,
};
use crate::error::{BackendError, Result};
use crate::parser::ResponseParser;
use crate::rank::{SearchTerms, resolve_raw_terms, resolve_terms};

/// Instruction sent with every prompt, asking for a numbered list of tools.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that recommends software tools and solutions.
When asked about tools in a certain category, provide a clear numbered list of the top options.
For each tool, include:
1. The name of the tool
2. A brief description (1-2 sentences)
3. The website URL if you know it

Format your response as a numbered list. \
Do not include any disclaimers or additional commentary.";

/// A text-generation backend.
pub trait BackendCaller: Send + Sync {
    /// Stable identity used for dialect selection and result keys.
    fn id(&self) -> &str;

    fn call(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, BackendError>;
}

/// Which resolution mode to use for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ModePreference {
    /// Structured, falling back to raw lines when nothing was parsed.
    #[default]
    Auto,
    Structured,
    Raw,
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Target,
    pub throttle: Duration,
    pub preview_chars: usize,
    pub sample_entities: usize,
    pub dialects: DialectSelector,
    pub system_prompt: String,
}

impl RunConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            sample_entities: DEFAULT_SAMPLE_ENTITIES,
            dialects: DialectSelector::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}

/// Parse and resolution output for one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub outcome: RankOutcome,
    pub mode: ResolutionMode,
    pub entities: ParseResult,
    pub stats: ParseStats,
}

/// Parses `raw_text` and resolves `target`, falling back to raw-line
/// resolution when the parse produced no entities.
///
/// # Examples
///
/// ```
/// use listrank_core::{DialectId, RankOutcome, ResolutionMode, Target};
/// use listrank_engine::workflow::analyze;
///
/// let target = Target::from_domain("acme.io");
/// let analysis = analyze("Acme is a solid pick.", DialectId::NumberedParen, &target);
/// assert_eq!(analysis.mode, ResolutionMode::RawLine);
/// assert_eq!(analysis.outcome, RankOutcome::MentionedUnranked);
/// ```
pub fn analyze(raw_text: &str, dialect: DialectId, target: &Target) -> Analysis {
    analyze_with_mode(raw_text, dialect, target, ModePreference::Auto)
}

/// [`analyze`] with an explicit mode preference.
pub fn analyze_with_mode(
    raw_text: &str,
    dialect: DialectId,
    target: &Target,
    preference: ModePreference,
) -> Analysis {
    let (entities, stats) = ResponseParser::new(dialect).parse_with_stats(raw_text);
    let terms = SearchTerms::new(&target.domain, &target.brand);

    let mode = match preference {
        ModePreference::Structured => ResolutionMode::Structured,
        ModePreference::Raw => ResolutionMode::RawLine,
        ModePreference::Auto if entities.is_empty() => ResolutionMode::RawLine,
        ModePreference::Auto => ResolutionMode::Structured,
    };
    let outcome = match mode {
        ResolutionMode::Structured => resolve_terms(&terms, &entities),
        ResolutionMode::RawLine => resolve_raw_terms(&terms, raw_text),
    };

    debug!(%dialect, ?mode, %outcome, entities = entities.len(), "resolved target");
    Analysis {
        outcome,
        mode,
        entities,
        stats,
    }
}

/// Builds the record for one successful backend response.
pub fn analyze_response(
    backend: &str,
    prompt: &str,
    raw_text: &str,
    config: &RunConfig,
) -> QueryRecord {
    let dialect = config.dialects.select(backend);
    let analysis = analyze(raw_text, dialect, &config.target);

    QueryRecord {
        backend: backend.to_string(),
        prompt: prompt.to_string(),
        rank: analysis.outcome,
        mode: Some(analysis.mode),
        raw_text_preview: preview(raw_text, config.preview_chars),
        sample_entities: analysis.entities.sample(config.sample_entities),
        entity_count: analysis.entities.len(),
        stats: analysis.stats,
    }
}

/// All records from one run, ordered by backend then prompt as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResults {
    pub target: Target,
    /// RFC 3339 timestamp of when the run finished.
    pub generated_at: String,
    pub records: Vec<QueryRecord>,
}

impl RunResults {
    pub fn get(&self, backend: &str, prompt: &str) -> Option<&QueryRecord> {
        self.records
            .iter()
            .find(|record| record.backend == backend && record.prompt == prompt)
    }

    pub fn summary(&self, top_threshold: usize) -> RunSummary {
        summarize_records(&self.records, top_threshold)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Sends every prompt to every backend and resolves the configured target.
///
/// Repeated prompts and repeated backend ids are queried once.
pub fn run_queries(
    backends: &[Box<dyn BackendCaller>],
    prompts: &[String],
    config: &RunConfig,
) -> RunResults {
    let backends = unique_backends(backends);
    let prompts = unique_prompts(prompts);
    let results: Mutex<BTreeMap<(String, String), QueryRecord>> = Mutex::new(BTreeMap::new());

    info!(
        backends = backends.len(),
        prompts = prompts.len(),
        domain = %config.target.domain,
        "starting rank run"
    );

    let query_backend = |backend: &dyn BackendCaller| {
        let id = backend.id();
        info!(backend = id, dialect = %config.dialects.select(id), "querying backend");

        for (idx, prompt) in prompts.iter().enumerate() {
            if idx > 0 && !config.throttle.is_zero() {
                thread::sleep(config.throttle);
            }
            let record = match backend.call(&config.system_prompt, prompt) {
                Ok(text) => analyze_response(id, prompt, &text, config),
                Err(err) => {
                    warn!(backend = id, prompt = %prompt, error = %err, "backend call failed");
                    QueryRecord::failed(id, prompt, &err.to_string())
                }
            };

            let mut map = results.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry((id.to_string(), prompt.to_string())).or_insert(record);
        }
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(backends.len().max(1))
        .build()
    {
        Ok(pool) => {
            use rayon::prelude::*;
            pool.install(|| backends.par_iter().for_each(|backend| query_backend(*backend)));
        }
        Err(err) => {
            warn!(error = %err, "thread pool unavailable, querying backends sequentially");
            backends.iter().for_each(|backend| query_backend(*backend));
        }
    }

    let mut map = results.into_inner().unwrap_or_else(PoisonError::into_inner);
    let mut records = Vec::with_capacity(map.len());
    for backend in &backends {
        for prompt in &prompts {
            if let Some(record) = map.remove(&(backend.id().to_string(), prompt.to_string())) {
                records.push(record);
            }
        }
    }

    RunResults {
        target: config.target.clone(),
        generated_at: Utc::now().to_rfc3339(),
        records,
    }
}

fn unique_backends(backends: &[Box<dyn BackendCaller>]) -> Vec<&dyn BackendCaller> {
    let mut unique: Vec<&dyn BackendCaller> = Vec::with_capacity(backends.len());
    for backend in backends {
        if unique.iter().any(|seen| seen.id() == backend.id()) {
            warn!(backend = backend.id(), "duplicate backend ignored");
            continue;
        }
        unique.push(&**backend);
    }
    unique
}

fn unique_prompts(prompts: &[String]) -> Vec<&str> {
    let mut unique: Vec<&str> = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        if !unique.contains(&prompt.as_str()) {
            unique.push(prompt);
        }
    }
    unique
}
