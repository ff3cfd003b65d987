//! Core value types for ranked list responses.
//!
//! This crate defines the data model shared by the parsing engine, the
//! orchestration layer and report consumers:
//!
//! - [`Entity`] — one recommended item (name, URL, description).
//! - [`ParseResult`] — entities in order of appearance; position is rank.
//! - [`RankOutcome`] — where the target was found, or why it was not.
//! - [`DialectId`] — which enumeration convention a backend uses.
//! - [`QueryRecord`] — the per backend, per prompt record reports consume.
//!
//! Summaries ([`summarize`], [`summarize_records`]) turn a run's outcomes
//! into per-backend mention and top-placement rates.
//!
//! # Example
//!
//! ```
//! use listrank_core::*;
//!
//! let parsed = ParseResult::new(vec![
//!     Entity::new("Beta").with_url("https://beta.io"),
//!     Entity::new("Acme").with_url("https://acme.io"),
//! ]);
//! assert_eq!(parsed.at_rank(2).unwrap().name, "Acme");
//!
//! let outcome = RankOutcome::Position(2);
//! assert_eq!(outcome.to_string(), "#2");
//! assert!(outcome.is_top(DEFAULT_TOP_RANK_THRESHOLD));
//! ```

mod summary;
mod types;

pub use summary::{
    BackendSummary, DEFAULT_TOP_RANK_THRESHOLD, RunSummary, summarize, summarize_records,
};
pub use types::*;
