//! Helpers for the plain list formats used while preparing prompts.

/// Characters stripped from the start of a prompt line.
const PROMPT_MARKER_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '-', ')', ' ',
];

/// Extracts prompts from a numbered or dashed list.
///
/// Only lines starting with a digit or `-` are kept; their leading marker
/// run is stripped and blank results are dropped.
///
/// # Examples
///
/// ```
/// use listrank_engine::lists::parse_prompt_list;
///
/// let text = "Sure! Here you go:\n\
///     1. best data anonymization tools\n\
///     2) open source test data\n\
///     - synthetic data generator";
/// assert_eq!(
///     parse_prompt_list(text),
///     vec![
///         "best data anonymization tools",
///         "open source test data",
///         "synthetic data generator",
///     ]
/// );
/// ```
pub fn parse_prompt_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|ch: char| ch.is_ascii_digit() || ch == '-'))
        .map(|line| line.trim_start_matches(PROMPT_MARKER_CHARS).trim())
        .filter(|prompt| !prompt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a comma-separated keyword list, keeping at most `top_k` entries.
///
/// # Examples
///
/// ```
/// use listrank_engine::lists::parse_keywords;
///
/// assert_eq!(
///     parse_keywords(" data masking, synthetic data ,, test data ", 2),
///     vec!["data masking", "synthetic data"]
/// );
/// ```
pub fn parse_keywords(text: &str, top_k: usize) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .take(top_k)
        .map(str::to_string)
        .collect()
}
