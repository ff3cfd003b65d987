//! Output formatting for parse results, outcomes and summaries.

use listrank_core::{Entity, ParseResult, RunSummary};
use serde::Serialize;

use crate::workflow::Analysis;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

fn serialize<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Option<Result<String, String>> {
    match format {
        OutputFormat::Json => Some(
            serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {e}")),
        ),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}")),
        ),
        OutputFormat::Table => None,
    }
}

/// Formats parsed entities in the requested output format.
pub fn format_entities(entities: &ParseResult, format: OutputFormat) -> Result<String, String> {
    serialize(entities, format).unwrap_or_else(|| Ok(entities_to_table(entities.entities())))
}

/// Formats a resolved response in the requested output format.
pub fn format_analysis(analysis: &Analysis, format: OutputFormat) -> Result<String, String> {
    serialize(analysis, format).unwrap_or_else(|| Ok(analysis_to_table(analysis)))
}

/// Formats a run summary in the requested output format.
pub fn format_summary(summary: &RunSummary, format: OutputFormat) -> Result<String, String> {
    serialize(summary, format).unwrap_or_else(|| Ok(summary_to_table(summary)))
}

/// Formats a prompt list in the requested output format.
pub fn format_prompts(prompts: &[String], format: OutputFormat) -> Result<String, String> {
    serialize(prompts, format).unwrap_or_else(|| {
        Ok(prompts
            .iter()
            .enumerate()
            .map(|(idx, prompt)| format!("{:>3}. {prompt}\n", idx + 1))
            .collect())
    })
}

fn entities_to_table(entities: &[Entity]) -> String {
    if entities.is_empty() {
        return "No entities found.\n".to_string();
    }

    let max_name = entities
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    out.push_str(&format!("  #  {:<width$}  URL\n", "Name", width = max_name));
    for (idx, entity) in entities.iter().enumerate() {
        let url = if entity.has_url() { entity.url.as_str() } else { "-" };
        out.push_str(&format!(
            "{:>3}  {:<width$}  {url}\n",
            idx + 1,
            entity.name,
            width = max_name
        ));
        if !entity.description.is_empty() {
            out.push_str(&format!("     {}\n", entity.description));
        }
    }
    out
}

fn analysis_to_table(analysis: &Analysis) -> String {
    let mode = match analysis.mode {
        listrank_core::ResolutionMode::Structured => "structured",
        listrank_core::ResolutionMode::RawLine => "raw lines",
    };

    let mut out = String::new();
    out.push_str(&format!("Rank: {}  Mode: {mode}\n", analysis.outcome));
    out.push_str(&format!(
        "Lines: {} relevant, {} items, {} continuations, {} orphans\n",
        analysis.stats.relevant_lines,
        analysis.stats.item_lines,
        analysis.stats.continuation_lines,
        analysis.stats.orphan_lines,
    ));
    if !analysis.entities.is_empty() {
        out.push('\n');
        out.push_str(&entities_to_table(analysis.entities.entities()));
    }
    out
}

fn summary_to_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Queries: {}  Top threshold: {}\n\n",
        summary.total_queries, summary.top_rank_threshold
    ));

    if summary.backends.is_empty() {
        out.push_str("No results.\n");
        return out;
    }

    let max_name = summary
        .backends
        .iter()
        .map(|b| b.backend.len())
        .max()
        .unwrap_or(7)
        .max(7);

    out.push_str(&format!(
        "{:<width$}  {:>5}  {:>9}  {:>5}  {:>6}  {:>9}  {:>5}\n",
        "Backend",
        "Total",
        "Mentioned",
        "Top",
        "Errors",
        "Mention %",
        "Top %",
        width = max_name
    ));
    for backend in &summary.backends {
        out.push_str(&format!(
            "{:<width$}  {:>5}  {:>9}  {:>5}  {:>6}  {:>9.1}  {:>5.1}\n",
            backend.backend,
            backend.total,
            backend.mentioned,
            backend.top_ranked,
            backend.errors,
            backend.mention_rate,
            backend.top_rate,
            width = max_name
        ));
    }

    if let Some(ref best) = summary.best_mention {
        out.push_str(&format!("\nBest visibility: {best}\n"));
    }
    if let Some(ref worst) = summary.worst_mention {
        out.push_str(&format!("Worst visibility: {worst}\n"));
    }
    if let Some(ref top) = summary.best_top {
        out.push_str(&format!("Most top placements: {top}\n"));
    }
    out
}
