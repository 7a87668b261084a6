//! Report Renderer: ranked screening results as DOCX documents and a CSV sheet.
//!
//! Rendering is pure; the handlers load rows and pass them in.

pub mod candidate;
pub mod docx;
pub mod handlers;
pub mod longlist;
pub mod spreadsheet;

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::CandidateRow;
use crate::models::match_result::MatchResultRow;

pub const ORGANISATION: &str = "African Union Commission";
pub const DIRECTORATE: &str = "Human Resources Management Directorate";
pub const UNIT: &str = "Talent Acquisition Unit";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("DOCX build failed: {0}")]
    Docx(String),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// One ranked result with the candidate it belongs to.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub result: MatchResultRow,
    pub candidate: CandidateRow,
}

/// Pairs results with their candidates, keeping result order. Results whose
/// candidate is gone are dropped.
pub fn join_ranked(results: Vec<MatchResultRow>, candidates: Vec<CandidateRow>) -> Vec<RankedEntry> {
    let mut by_id: HashMap<Uuid, CandidateRow> =
        candidates.into_iter().map(|c| (c.id, c)).collect();
    results
        .into_iter()
        .filter_map(|result| {
            by_id
                .remove(&result.candidate_id)
                .map(|candidate| RankedEntry { result, candidate })
        })
        .collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

/// Filename-safe form of a title or name.
pub fn file_slug(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
