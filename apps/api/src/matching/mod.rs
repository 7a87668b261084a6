//! Matching Orchestrator — criteria extraction, CV parsing, scoring, ranking.
//!
//! The AI decides per-criterion scores; everything after that (bonuses, totals,
//! cutoff, ranks, statistics) is computed here deterministically.

pub mod countries;
pub mod ranking;
pub mod scoring;
pub mod service;
pub mod statistics;

pub use countries::LeastRepresentedCountries;
pub use service::{BatchOutcome, MatchingService};
