//! Candidate & Job Store — persistence for jobs, candidates and match results.
//!
//! `PgStore` is the production backend. Handlers and the matching service only
//! see `Arc<dyn ScreeningStore>`, so tests run against the in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, Gender, LanguageSkill, Skills};
use crate::models::criteria::JobCriteria;
use crate::models::job::{GradeLevel, JobRow, JobStatus, JobSummary};
use crate::models::match_result::{MatchResultRow, RankAssignment, ScoreMap};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate reference number '{0}'")]
    DuplicateReference(String),
}

impl StoreError {
    pub fn job_not_found(id: Uuid) -> Self {
        StoreError::NotFound(format!("Job {id}"))
    }

    pub fn candidate_not_found(id: Uuid) -> Self {
        StoreError::NotFound(format!("Candidate {id}"))
    }

    pub fn result_not_found(id: Uuid) -> Self {
        StoreError::NotFound(format!("Match result {id}"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub reference_number: Option<String>,
    pub department: Option<String>,
    pub directorate: String,
    pub duty_station: Option<String>,
    pub grade_level: GradeLevel,
    pub description: Option<String>,
    pub raw_jd_text: String,
}

/// Partial job update; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub reference_number: Option<String>,
    pub department: Option<String>,
    pub duty_station: Option<String>,
    pub grade_level: Option<GradeLevel>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub job_id: Uuid,
    pub full_name: String,
    pub cv_filename: String,
    pub cv_file_key: Option<String>,
    pub cv_raw_text: String,
}

/// Everything CV parsing writes back onto a candidate.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country_of_residence: Option<String>,
    pub is_least_represented_country: bool,
    pub has_disability: bool,
    pub disability_details: Option<String>,
    pub education: Vec<Value>,
    pub experience: Vec<Value>,
    pub skills: Skills,
    pub certifications: Vec<Value>,
    pub languages: Vec<LanguageSkill>,
    pub parsed_cv_data: Value,
}

/// A fully scored result, before ranking.
#[derive(Debug, Clone)]
pub struct NewMatchResult {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub education_scores: ScoreMap,
    pub education_total: f64,
    pub experience_scores: ScoreMap,
    pub experience_total: f64,
    pub base_score: f64,
    pub bonus_female: i32,
    pub bonus_age: i32,
    pub bonus_least_represented: i32,
    pub bonus_inclusion: i32,
    pub total_bonus: i32,
    pub final_score: f64,
    pub passes_cutoff: bool,
    pub overall_reasoning: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub flags: Vec<String>,
    pub recommendations: String,
}

#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> StoreResult<JobRow>;
    async fn get_job(&self, id: Uuid) -> StoreResult<JobRow>;
    /// Newest first, with candidate counts.
    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<Vec<JobSummary>>;
    /// A grade change also recomputes `min_pass_mark`.
    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<JobRow>;
    /// Stores both criteria lists, the pass mark and the new status in one write.
    async fn save_criteria(
        &self,
        id: Uuid,
        criteria: &JobCriteria,
        min_pass_mark: i32,
        status: JobStatus,
    ) -> StoreResult<JobRow>;
    async fn set_job_status(
        &self,
        id: Uuid,
        status: JobStatus,
        screening_completed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<JobRow>;
    /// Cascades to candidates and results.
    async fn delete_job(&self, id: Uuid) -> StoreResult<()>;

    async fn insert_candidate(&self, candidate: NewCandidate) -> StoreResult<CandidateRow>;
    async fn get_candidate(&self, id: Uuid) -> StoreResult<CandidateRow>;
    /// Creation order.
    async fn list_candidates(&self, job_id: Uuid) -> StoreResult<Vec<CandidateRow>>;
    async fn count_candidates(&self, job_id: Uuid) -> StoreResult<i64>;
    async fn save_candidate_profile(
        &self,
        id: Uuid,
        profile: CandidateProfile,
    ) -> StoreResult<CandidateRow>;
    /// Cascades to the candidate's result.
    async fn delete_candidate(&self, id: Uuid) -> StoreResult<()>;

    /// Inserts or overwrites the single result for `(job_id, candidate_id)`.
    /// Rank fields are left to the next ranking pass.
    async fn upsert_match_result(&self, result: NewMatchResult) -> StoreResult<MatchResultRow>;
    async fn find_match_result(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<MatchResultRow>>;
    async fn get_match_result(&self, id: Uuid) -> StoreResult<MatchResultRow>;
    /// Ordered by final score descending; ties in creation order.
    async fn list_match_results(&self, job_id: Uuid) -> StoreResult<Vec<MatchResultRow>>;
    /// Writes all rank assignments for one job atomically.
    async fn apply_ranks(&self, job_id: Uuid, ranks: &[RankAssignment]) -> StoreResult<()>;
}
