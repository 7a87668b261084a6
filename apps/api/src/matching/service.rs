use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gateway::cv_parser::ParsedCv;
use crate::gateway::AiGateway;
use crate::matching::countries::LeastRepresentedCountries;
use crate::matching::ranking::assign_ranks;
use crate::matching::scoring::{Bonuses, ScoreCard};
use crate::matching::statistics::{self, ScreeningStatistics};
use crate::models::candidate::{parse_date_of_birth, CandidateRow, Gender};
use crate::models::job::{JobRow, JobStatus};
use crate::models::match_result::{MatchResultRow, RankAssignment};
use crate::store::{CandidateProfile, NewMatchResult, ScreeningStore};

/// Summary of a finished batch run. `results` are in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub candidates_processed: usize,
    pub results: Vec<MatchResultRow>,
}

pub struct MatchingService {
    store: Arc<dyn ScreeningStore>,
    gateway: AiGateway,
    countries: LeastRepresentedCountries,
}

impl MatchingService {
    pub fn new(
        store: Arc<dyn ScreeningStore>,
        gateway: AiGateway,
        countries: LeastRepresentedCountries,
    ) -> Self {
        Self {
            store,
            gateway,
            countries,
        }
    }

    /// Extracts criteria from the job's description and activates the job.
    /// Re-running replaces the stored criteria.
    pub async fn process_job_description(&self, job: &JobRow) -> Result<JobRow, AppError> {
        info!("Extracting criteria for job {}", job.id);
        let criteria = self
            .gateway
            .extract_job_criteria(&job.raw_jd_text, &job.title)
            .await?;

        let job = self
            .store
            .save_criteria(
                job.id,
                &criteria,
                job.grade_level.min_pass_mark(),
                JobStatus::Active,
            )
            .await?;
        info!(
            "Job {} active, min pass mark {}",
            job.id, job.min_pass_mark
        );
        Ok(job)
    }

    /// Parses the candidate's CV text and writes the extracted profile back.
    pub async fn process_candidate_cv(
        &self,
        candidate: &CandidateRow,
    ) -> Result<CandidateRow, AppError> {
        if candidate.cv_raw_text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "CV text not available for candidate {}",
                candidate.id
            )));
        }

        info!("Parsing CV for candidate {}", candidate.id);
        let parsed = self.gateway.parse_cv(&candidate.cv_raw_text).await?;
        let profile = build_profile(candidate, parsed, &self.countries);
        let updated = self
            .store
            .save_candidate_profile(candidate.id, profile)
            .await?;
        Ok(updated)
    }

    pub async fn match_candidate_to_job(
        &self,
        candidate: &CandidateRow,
        job: &JobRow,
    ) -> Result<MatchResultRow, AppError> {
        self.match_candidate_on(candidate, job, Utc::now().date_naive())
            .await
    }

    /// Scores one candidate against one job as of `today` (age bonus date).
    async fn match_candidate_on(
        &self,
        candidate: &CandidateRow,
        job: &JobRow,
        today: NaiveDate,
    ) -> Result<MatchResultRow, AppError> {
        if !job.criteria_extracted() {
            return Err(AppError::Validation(format!(
                "Job {} has no extracted criteria. Process the job description first.",
                job.id
            )));
        }
        let cv_data = candidate.parsed_cv_data.as_ref().ok_or_else(|| {
            AppError::Validation(format!("Candidate {} CV has not been parsed", candidate.id))
        })?;

        info!("Matching candidate {} to job {}", candidate.id, job.id);
        let assessment = self
            .gateway
            .match_cv_to_job(
                &cv_data.0,
                &job.education_criteria.0,
                &job.experience_criteria.0,
                &job.title,
            )
            .await?;

        let bonuses = Bonuses::for_candidate(candidate, today);
        let card = ScoreCard::compute(&assessment, bonuses, job.min_pass_mark);

        let result = self
            .store
            .upsert_match_result(NewMatchResult {
                job_id: job.id,
                candidate_id: candidate.id,
                education_scores: assessment.education_scores,
                education_total: card.education_total,
                experience_scores: assessment.experience_scores,
                experience_total: card.experience_total,
                base_score: card.base_score,
                bonus_female: card.bonuses.female,
                bonus_age: card.bonuses.age,
                bonus_least_represented: card.bonuses.least_represented,
                bonus_inclusion: card.bonuses.inclusion,
                total_bonus: card.total_bonus,
                final_score: card.final_score,
                passes_cutoff: card.passes_cutoff,
                overall_reasoning: assessment.overall_reasoning,
                strengths: assessment.strengths,
                weaknesses: assessment.weaknesses,
                flags: assessment.flags,
                recommendations: assessment.recommendations,
            })
            .await?;

        info!(
            "Candidate {}: base {:.1}, bonus {}, final {:.1}, passes cutoff: {}",
            candidate.id,
            result.base_score,
            result.total_bonus,
            result.final_score,
            result.passes_cutoff
        );
        Ok(result)
    }

    /// Parses (where needed) and matches every candidate of the job in creation
    /// order, then ranks and moves the job to `screening`.
    ///
    /// The first failure aborts the batch; results already written are kept.
    pub async fn process_all_candidates(&self, job_id: Uuid) -> Result<BatchOutcome, AppError> {
        let job = self.store.get_job(job_id).await?;
        if !job.criteria_extracted() {
            return Err(AppError::Validation(
                "Job criteria not extracted. Process the job description first.".to_string(),
            ));
        }
        let candidates = self.store.list_candidates(job_id).await?;
        if candidates.is_empty() {
            return Err(AppError::Validation(
                "No candidates to process for this job".to_string(),
            ));
        }

        info!(
            "Screening {} candidates for job {job_id}",
            candidates.len()
        );
        let today = Utc::now().date_naive();
        for candidate in &candidates {
            let parsed;
            let candidate = if candidate.is_parsed() {
                candidate
            } else {
                parsed = self.process_candidate_cv(candidate).await?;
                &parsed
            };
            self.match_candidate_on(candidate, &job, today).await?;
        }

        self.rank_candidates(job_id).await?;
        self.store
            .set_job_status(job_id, JobStatus::Screening, Some(Utc::now()))
            .await?;

        let results = self.store.list_match_results(job_id).await?;
        info!("Screening finished for job {job_id}: {} results", results.len());
        Ok(BatchOutcome {
            candidates_processed: candidates.len(),
            results,
        })
    }

    /// Recomputes every rank of the job from scratch.
    pub async fn rank_candidates(&self, job_id: Uuid) -> Result<Vec<RankAssignment>, AppError> {
        let results = self.store.list_match_results(job_id).await?;
        let ranks = assign_ranks(&results);
        self.store.apply_ranks(job_id, &ranks).await?;
        Ok(ranks)
    }

    pub async fn get_statistics(&self, job_id: Uuid) -> Result<ScreeningStatistics, AppError> {
        self.store.get_job(job_id).await?;
        let results = self.store.list_match_results(job_id).await?;
        let candidates = self.store.list_candidates(job_id).await?;
        Ok(statistics::compute(&results, &candidates))
    }

    /// Top `limit` results by final score.
    pub async fn get_longlist(
        &self,
        job_id: Uuid,
        limit: usize,
    ) -> Result<Vec<MatchResultRow>, AppError> {
        let mut results = self.store.list_match_results(job_id).await?;
        results.truncate(limit);
        Ok(results)
    }

    pub async fn complete_screening(&self, job_id: Uuid) -> Result<JobRow, AppError> {
        Ok(self
            .store
            .set_job_status(job_id, JobStatus::Completed, None)
            .await?)
    }

    pub async fn archive_job(&self, job_id: Uuid) -> Result<JobRow, AppError> {
        Ok(self
            .store
            .set_job_status(job_id, JobStatus::Archived, None)
            .await?)
    }
}

/// Maps a parse result onto the candidate's stored profile.
pub fn build_profile(
    current: &CandidateRow,
    parsed: ParsedCv,
    countries: &LeastRepresentedCountries,
) -> CandidateProfile {
    let info = parsed.personal_info;
    let full_name = info
        .full_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| current.full_name.clone());
    let gender = info
        .gender
        .as_deref()
        .map_or(Gender::NotSpecified, Gender::from_ai_label);
    let date_of_birth =
        parse_date_of_birth(info.date_of_birth.as_deref()).or(current.date_of_birth);
    // A missing nationality keeps the earlier one and its flag.
    let (nationality, is_least_represented_country) =
        match info.nationality.filter(|n| !n.trim().is_empty()) {
            Some(nationality) => {
                let flag = countries.contains(Some(nationality.as_str()));
                (Some(nationality), flag)
            }
            None => (
                current.nationality.clone(),
                current.is_least_represented_country,
            ),
        };

    CandidateProfile {
        full_name,
        email: info.email,
        phone: info.phone,
        gender,
        date_of_birth,
        nationality,
        country_of_residence: info.country_of_residence,
        is_least_represented_country,
        has_disability: parsed.disability_mentioned.unwrap_or(false),
        disability_details: parsed.disability_details,
        education: parsed.education,
        experience: parsed.experience,
        languages: parsed.skills.languages.clone(),
        skills: parsed.skills,
        certifications: parsed.certifications,
        parsed_cv_data: parsed.raw,
    }
}
