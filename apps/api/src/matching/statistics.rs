use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, Gender};
use crate::models::match_result::MatchResultRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderDistribution {
    pub female: i64,
    pub male: i64,
    /// Everyone scored who is neither female nor male.
    pub other: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningBreakdown {
    pub passing_cutoff: i64,
    pub failing_cutoff: i64,
    pub gender_distribution: GenderDistribution,
    pub least_represented_countries: i64,
    pub score_statistics: ScoreSummary,
    pub longlist_count: i64,
}

/// Serializes as `{"total_candidates": 0}` when nothing has been scored, and
/// with the full breakdown flattened alongside otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningStatistics {
    pub total_candidates: i64,
    #[serde(flatten)]
    pub breakdown: Option<ScreeningBreakdown>,
}

/// Aggregates over the job's match results. Gender and country counts cover
/// the candidates that have a result, so every count is bounded by the total.
pub fn compute(results: &[MatchResultRow], candidates: &[CandidateRow]) -> ScreeningStatistics {
    let total = results.len() as i64;
    if results.is_empty() {
        return ScreeningStatistics {
            total_candidates: 0,
            breakdown: None,
        };
    }

    let by_id: HashMap<Uuid, &CandidateRow> = candidates.iter().map(|c| (c.id, c)).collect();
    let scored: Vec<&CandidateRow> = results
        .iter()
        .filter_map(|r| by_id.get(&r.candidate_id).copied())
        .collect();

    let female = scored.iter().filter(|c| c.gender == Gender::Female).count() as i64;
    let male = scored.iter().filter(|c| c.gender == Gender::Male).count() as i64;
    let least_represented = scored
        .iter()
        .filter(|c| c.is_least_represented_country)
        .count() as i64;

    let passing = results.iter().filter(|r| r.passes_cutoff).count() as i64;
    let scores = results.iter().map(|r| r.final_score);
    let highest = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let lowest = scores.clone().fold(f64::INFINITY, f64::min);
    let average = scores.sum::<f64>() / results.len() as f64;

    ScreeningStatistics {
        total_candidates: total,
        breakdown: Some(ScreeningBreakdown {
            passing_cutoff: passing,
            failing_cutoff: total - passing,
            gender_distribution: GenderDistribution {
                female,
                male,
                other: total - female - male,
            },
            least_represented_countries: least_represented,
            score_statistics: ScoreSummary {
                average,
                highest,
                lowest,
            },
            longlist_count: results.iter().filter(|r| r.is_in_longlist).count() as i64,
        }),
    }
}
