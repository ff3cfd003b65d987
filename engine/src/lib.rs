//! Ranked-list extraction from text-generation responses.
//!
//! Backends answer "what are the best tools for X?" with enumerated lists,
//! each in its own dialect. This crate turns a response into an ordered
//! [`ParseResult`] and finds where a target site appears in it.
//!
//! # Main entry points
//!
//! - [`parse`] — split a response into entities for one dialect. Never fails.
//! - [`resolve`] — find the target among parsed entities.
//! - [`resolve_raw`] — find the target by scanning raw lines; used when a
//!   parse yields nothing.
//! - [`workflow::run_queries`] — query many backends with many prompts and
//!   collect one [`QueryRecord`] per pair.
//!
//! # Example
//!
//! ```
//! use listrank_core::{DialectId, RankOutcome};
//! use listrank_engine::{parse, resolve};
//!
//! let response = "\
//! 1. Acme Tool - a widget. https://acme.io
//! 2. Beta - other. https://beta.io
//! ";
//!
//! let parsed = parse(response, DialectId::PermissiveNumbered);
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(parsed.entities()[0].url, "https://acme.io");
//! assert_eq!(resolve("acme.io", "Acme", &parsed), RankOutcome::Position(1));
//! ```
//!
//! [`QueryRecord`]: listrank_core::QueryRecord

pub mod config;
pub mod error;
pub mod lists;
pub mod output;
pub mod parser;
pub mod rank;
pub mod workflow;

use listrank_core::{DialectId, ParseResult};

pub use config::{DialectSelector, RankConfig};
pub use error::{BackendError, ConfigError};
pub use parser::ResponseParser;
pub use rank::{SearchTerms, resolve, resolve_raw};
pub use workflow::{BackendCaller, RunConfig, RunResults, analyze, run_queries};

/// Parses a response with the given dialect.
///
/// Text without recognizable items yields an empty result.
///
/// # Examples
///
/// ```
/// use listrank_core::DialectId;
/// use listrank_engine::parse;
///
/// let parsed = parse("* Gizmo (https://gizmo.com) does X", DialectId::NumberedOrBulleted);
/// assert_eq!(parsed.entities()[0].url, "https://gizmo.com");
/// assert!(parse("", DialectId::NumberedOrBulleted).is_empty());
/// ```
pub fn parse(raw_text: &str, dialect: DialectId) -> ParseResult {
    ResponseParser::new(dialect).parse(raw_text)
}
