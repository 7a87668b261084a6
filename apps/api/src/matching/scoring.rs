//! Deterministic score arithmetic: bonuses, totals and the pass-mark cutoff.
//!
//! base  = education_total + experience_total   (≤ 100)
//! bonus = female + age + least_represented + inclusion   (each 0 or 5)
//! final = base + bonus
//! The cutoff compares `base` only; bonuses never lift a candidate over it.

use chrono::NaiveDate;
use tracing::warn;

use crate::gateway::assessment::CvAssessment;
use crate::models::candidate::{CandidateRow, Gender};
use crate::models::match_result::ScoreMap;

pub const BONUS_POINTS: i32 = 5;
/// Candidates at or below this age on the scoring date earn the age bonus.
pub const YOUTH_AGE_LIMIT: u32 = 35;

const TOTAL_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bonuses {
    pub female: i32,
    pub age: i32,
    pub least_represented: i32,
    pub inclusion: i32,
}

impl Bonuses {
    pub fn for_candidate(candidate: &CandidateRow, today: NaiveDate) -> Self {
        let points = |earned: bool| if earned { BONUS_POINTS } else { 0 };
        Self {
            female: points(candidate.gender == Gender::Female),
            age: points(
                candidate
                    .age_on(today)
                    .map_or(false, |age| age <= YOUTH_AGE_LIMIT),
            ),
            least_represented: points(candidate.is_least_represented_country),
            inclusion: points(candidate.has_disability),
        }
    }

    pub fn total(&self) -> i32 {
        self.female + self.age + self.least_represented + self.inclusion
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard {
    pub education_total: f64,
    pub experience_total: f64,
    pub base_score: f64,
    pub bonuses: Bonuses,
    pub total_bonus: i32,
    pub final_score: f64,
    pub passes_cutoff: bool,
}

impl ScoreCard {
    /// Totals are recomputed from the per-criterion scores. Totals reported by
    /// the model are only compared, and a mismatch is logged.
    pub fn compute(assessment: &CvAssessment, bonuses: Bonuses, min_pass_mark: i32) -> Self {
        let education_total = sum_scores(&assessment.education_scores);
        let experience_total = sum_scores(&assessment.experience_scores);
        let base_score = education_total + experience_total;

        for (label, reported, computed) in [
            ("education_total", assessment.education_total, education_total),
            ("experience_total", assessment.experience_total, experience_total),
            ("base_score", assessment.base_score, base_score),
        ] {
            if let Some(reported) = reported {
                if (reported - computed).abs() > TOTAL_TOLERANCE {
                    warn!("Model reported {label}={reported}, recomputed {computed}");
                }
            }
        }

        let total_bonus = bonuses.total();
        Self {
            education_total,
            experience_total,
            base_score,
            bonuses,
            total_bonus,
            final_score: base_score + f64::from(total_bonus),
            passes_cutoff: base_score >= f64::from(min_pass_mark),
        }
    }
}

fn sum_scores(scores: &ScoreMap) -> f64 {
    scores.values().map(|s| s.score).sum()
}
