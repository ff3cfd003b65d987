//! Per-backend visibility statistics over a set of rank outcomes.

use serde::{Deserialize, Serialize};

use crate::types::{QueryRecord, RankOutcome};

/// Positions at or above this rank count as a top placement by default.
pub const DEFAULT_TOP_RANK_THRESHOLD: usize = 3;

/// Counts and rates for one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSummary {
    pub backend: String,
    pub total: usize,
    /// Ranked positions plus unranked mentions.
    pub mentioned: usize,
    pub top_ranked: usize,
    pub not_mentioned: usize,
    pub errors: usize,
    /// Percentage of queries mentioning the target, one decimal.
    pub mention_rate: f64,
    /// Percentage of queries ranking the target in the top threshold, one decimal.
    pub top_rate: f64,
}

impl BackendSummary {
    fn new(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            total: 0,
            mentioned: 0,
            top_ranked: 0,
            not_mentioned: 0,
            errors: 0,
            mention_rate: 0.0,
            top_rate: 0.0,
        }
    }

    fn record(&mut self, outcome: &RankOutcome, top_threshold: usize) {
        self.total += 1;
        match outcome {
            RankOutcome::Position(_) => {
                self.mentioned += 1;
                if outcome.is_top(top_threshold) {
                    self.top_ranked += 1;
                }
            }
            RankOutcome::MentionedUnranked => self.mentioned += 1,
            RankOutcome::NotMentioned => self.not_mentioned += 1,
            RankOutcome::Error(_) => self.errors += 1,
        }
    }

    fn finish(&mut self) {
        self.mention_rate = percentage(self.mentioned, self.total);
        self.top_rate = percentage(self.top_ranked, self.total);
    }
}

/// Summary across all backends of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_queries: usize,
    pub top_rank_threshold: usize,
    /// One entry per backend, in order of first appearance.
    pub backends: Vec<BackendSummary>,
    /// Backend with the highest mention rate (first wins ties).
    pub best_mention: Option<String>,
    /// Backend with the lowest mention rate (first wins ties).
    pub worst_mention: Option<String>,
    /// Backend with the highest top rate (first wins ties).
    pub best_top: Option<String>,
}

impl RunSummary {
    pub fn backend(&self, name: &str) -> Option<&BackendSummary> {
        self.backends.iter().find(|summary| summary.backend == name)
    }
}

/// Summarizes `(backend, outcome)` pairs.
///
/// # Examples
///
/// ```
/// use listrank_core::{RankOutcome, summarize};
///
/// let outcomes = [
///     ("openai", RankOutcome::Position(1)),
///     ("openai", RankOutcome::NotMentioned),
///     ("claude", RankOutcome::MentionedUnranked),
/// ];
/// let summary = summarize(outcomes.iter().map(|(b, o)| (*b, o)), 3);
/// assert_eq!(summary.total_queries, 3);
/// assert_eq!(summary.backend("openai").unwrap().mention_rate, 50.0);
/// assert_eq!(summary.best_mention.as_deref(), Some("claude"));
/// ```
pub fn summarize<'a, I>(outcomes: I, top_threshold: usize) -> RunSummary
where
    I: IntoIterator<Item = (&'a str, &'a RankOutcome)>,
{
    let mut backends: Vec<BackendSummary> = Vec::new();
    let mut total_queries = 0usize;

    for (backend, outcome) in outcomes {
        total_queries += 1;
        let idx = match backends.iter().position(|s| s.backend == backend) {
            Some(idx) => idx,
            None => {
                backends.push(BackendSummary::new(backend));
                backends.len() - 1
            }
        };
        backends[idx].record(outcome, top_threshold);
    }

    for summary in &mut backends {
        summary.finish();
    }

    let best_mention = pick(&backends, |s| s.mention_rate, |a, b| a > b);
    let worst_mention = pick(&backends, |s| s.mention_rate, |a, b| a < b);
    let best_top = pick(&backends, |s| s.top_rate, |a, b| a > b);

    RunSummary {
        total_queries,
        top_rank_threshold: top_threshold,
        backends,
        best_mention,
        worst_mention,
        best_top,
    }
}

/// Summarizes stored query records.
pub fn summarize_records(records: &[QueryRecord], top_threshold: usize) -> RunSummary {
    summarize(
        records.iter().map(|r| (r.backend.as_str(), &r.rank)),
        top_threshold,
    )
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

fn pick(
    backends: &[BackendSummary],
    key: impl Fn(&BackendSummary) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<String> {
    let mut best: Option<&BackendSummary> = None;
    for candidate in backends {
        if best.is_none_or(|current| better(key(candidate), key(current))) {
            best = Some(candidate);
        }
    }
    best.map(|s| s.backend.clone())
}
