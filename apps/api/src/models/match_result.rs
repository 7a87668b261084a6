use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::nullable;

pub const CRITERION_MAX_SCORE: f64 = 10.0;

fn default_max() -> f64 {
    CRITERION_MAX_SCORE
}

/// One criterion's score as returned by the model: `{score, max, reasoning}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub reasoning: String,
}

/// Criterion id → score. Education maps hold 3 entries, experience maps 7.
pub type ScoreMap = BTreeMap<String, CriterionScore>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchResultRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub education_scores: Json<ScoreMap>,
    pub education_total: f64,
    pub experience_scores: Json<ScoreMap>,
    pub experience_total: f64,
    pub base_score: f64,
    pub bonus_female: i32,
    pub bonus_age: i32,
    pub bonus_least_represented: i32,
    pub bonus_inclusion: i32,
    pub total_bonus: i32,
    pub final_score: f64,
    pub rank: Option<i32>,
    pub is_in_longlist: bool,
    pub passes_cutoff: bool,
    pub overall_reasoning: String,
    pub strengths: Json<Vec<String>>,
    pub weaknesses: Json<Vec<String>>,
    pub flags: Json<Vec<String>>,
    pub recommendations: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchResultRow {
    /// Labels of the bonuses this result earned, for report summaries.
    pub fn earned_bonus_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.bonus_female > 0 {
            labels.push("Female (+5)");
        }
        if self.bonus_age > 0 {
            labels.push("Age ≤35 (+5)");
        }
        if self.bonus_least_represented > 0 {
            labels.push("Least Rep. Country (+5)");
        }
        if self.bonus_inclusion > 0 {
            labels.push("Inclusion (+5)");
        }
        labels
    }
}

/// Rank position computed for one result during a ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAssignment {
    pub result_id: Uuid,
    pub rank: i32,
    pub is_in_longlist: bool,
}
