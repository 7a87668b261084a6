//! In-memory `ScreeningStore` for tests. Mirrors the Postgres semantics that the
//! service relies on: cascades, the (job, candidate) upsert and result ordering.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, Gender, Skills};
use crate::models::criteria::JobCriteria;
use crate::models::job::{JobRow, JobStatus, JobSummary};
use crate::models::match_result::{MatchResultRow, RankAssignment};
use crate::store::{
    CandidateProfile, JobFilter, JobUpdate, NewCandidate, NewJob, NewMatchResult,
    ScreeningStore, StoreError, StoreResult,
};

#[derive(Default)]
struct Tables {
    jobs: Vec<JobRow>,
    candidates: Vec<CandidateRow>,
    results: Vec<MatchResultRow>,
    /// Monotonic clock so creation order is total even within one instant.
    ticks: i64,
}

impl Tables {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(self.ticks)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }
}

#[async_trait]
impl ScreeningStore for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> StoreResult<JobRow> {
        self.with(|t| {
            if let Some(reference) = &job.reference_number {
                if t
                    .jobs
                    .iter()
                    .any(|j| j.reference_number.as_ref() == Some(reference))
                {
                    return Err(StoreError::DuplicateReference(reference.clone()));
                }
            }
            let now = t.now();
            let row = JobRow {
                id: Uuid::new_v4(),
                title: job.title,
                reference_number: job.reference_number,
                department: job.department,
                directorate: Some(job.directorate),
                duty_station: job.duty_station,
                grade_level: job.grade_level,
                description: job.description,
                raw_jd_text: job.raw_jd_text,
                education_criteria: Json(Vec::new()),
                experience_criteria: Json(Vec::new()),
                min_pass_mark: job.grade_level.min_pass_mark(),
                status: JobStatus::Draft,
                created_at: now,
                updated_at: now,
                screening_completed_at: None,
            };
            t.jobs.push(row.clone());
            Ok(row)
        })
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<JobRow> {
        self.with(|t| {
            t.jobs
                .iter()
                .find(|j| j.id == id)
                .cloned()
                .ok_or_else(|| StoreError::job_not_found(id))
        })
    }

    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<Vec<JobSummary>> {
        self.with(|t| {
            let mut jobs: Vec<&JobRow> = t
                .jobs
                .iter()
                .filter(|j| filter.status.map_or(true, |s| j.status == s))
                .collect();
            jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(jobs
                .into_iter()
                .skip(filter.skip.max(0) as usize)
                .take(filter.limit.max(0) as usize)
                .map(|j| JobSummary {
                    id: j.id,
                    title: j.title.clone(),
                    reference_number: j.reference_number.clone(),
                    grade_level: j.grade_level,
                    status: j.status,
                    created_at: j.created_at,
                    candidate_count: t.candidates.iter().filter(|c| c.job_id == j.id).count()
                        as i64,
                })
                .collect())
        })
    }

    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<JobRow> {
        self.with(|t| {
            let now = t.now();
            let job = t
                .jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| StoreError::job_not_found(id))?;
            if let Some(title) = update.title {
                job.title = title;
            }
            if let Some(reference) = update.reference_number {
                job.reference_number = Some(reference);
            }
            if let Some(department) = update.department {
                job.department = Some(department);
            }
            if let Some(duty_station) = update.duty_station {
                job.duty_station = Some(duty_station);
            }
            if let Some(grade) = update.grade_level {
                job.grade_level = grade;
                job.min_pass_mark = grade.min_pass_mark();
            }
            if let Some(description) = update.description {
                job.description = Some(description);
            }
            if let Some(status) = update.status {
                job.status = status;
            }
            job.updated_at = now;
            Ok(job.clone())
        })
    }

    async fn save_criteria(
        &self,
        id: Uuid,
        criteria: &JobCriteria,
        min_pass_mark: i32,
        status: JobStatus,
    ) -> StoreResult<JobRow> {
        self.with(|t| {
            let now = t.now();
            let job = t
                .jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| StoreError::job_not_found(id))?;
            job.education_criteria = Json(criteria.education_criteria.clone());
            job.experience_criteria = Json(criteria.experience_criteria.clone());
            job.min_pass_mark = min_pass_mark;
            job.status = status;
            job.updated_at = now;
            Ok(job.clone())
        })
    }

    async fn set_job_status(
        &self,
        id: Uuid,
        status: JobStatus,
        screening_completed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<JobRow> {
        self.with(|t| {
            let now = t.now();
            let job = t
                .jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| StoreError::job_not_found(id))?;
            job.status = status;
            if screening_completed_at.is_some() {
                job.screening_completed_at = screening_completed_at;
            }
            job.updated_at = now;
            Ok(job.clone())
        })
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        self.with(|t| {
            let before = t.jobs.len();
            t.jobs.retain(|j| j.id != id);
            if t.jobs.len() == before {
                return Err(StoreError::job_not_found(id));
            }
            t.candidates.retain(|c| c.job_id != id);
            t.results.retain(|r| r.job_id != id);
            Ok(())
        })
    }

    async fn insert_candidate(&self, candidate: NewCandidate) -> StoreResult<CandidateRow> {
        self.with(|t| {
            let now = t.now();
            let row = CandidateRow {
                id: Uuid::new_v4(),
                job_id: candidate.job_id,
                full_name: candidate.full_name,
                email: None,
                phone: None,
                gender: Gender::NotSpecified,
                date_of_birth: None,
                nationality: None,
                country_of_residence: None,
                is_least_represented_country: false,
                has_disability: false,
                disability_details: None,
                cv_filename: Some(candidate.cv_filename),
                cv_file_key: candidate.cv_file_key,
                cv_raw_text: candidate.cv_raw_text,
                education: Json(Vec::new()),
                experience: Json(Vec::new()),
                skills: Json(Skills::default()),
                certifications: Json(Vec::new()),
                languages: Json(Vec::new()),
                parsed_cv_data: None,
                created_at: now,
                updated_at: now,
            };
            t.candidates.push(row.clone());
            Ok(row)
        })
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<CandidateRow> {
        self.with(|t| {
            t.candidates
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| StoreError::candidate_not_found(id))
        })
    }

    async fn list_candidates(&self, job_id: Uuid) -> StoreResult<Vec<CandidateRow>> {
        self.with(|t| {
            Ok(t.candidates
                .iter()
                .filter(|c| c.job_id == job_id)
                .cloned()
                .collect())
        })
    }

    async fn count_candidates(&self, job_id: Uuid) -> StoreResult<i64> {
        self.with(|t| Ok(t.candidates.iter().filter(|c| c.job_id == job_id).count() as i64))
    }

    async fn save_candidate_profile(
        &self,
        id: Uuid,
        profile: CandidateProfile,
    ) -> StoreResult<CandidateRow> {
        self.with(|t| {
            let now = t.now();
            let row = t
                .candidates
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| StoreError::candidate_not_found(id))?;
            row.full_name = profile.full_name;
            row.email = profile.email;
            row.phone = profile.phone;
            row.gender = profile.gender;
            row.date_of_birth = profile.date_of_birth;
            row.nationality = profile.nationality;
            row.country_of_residence = profile.country_of_residence;
            row.is_least_represented_country = profile.is_least_represented_country;
            row.has_disability = profile.has_disability;
            row.disability_details = profile.disability_details;
            row.education = Json(profile.education);
            row.experience = Json(profile.experience);
            row.skills = Json(profile.skills);
            row.certifications = Json(profile.certifications);
            row.languages = Json(profile.languages);
            row.parsed_cv_data = Some(Json(profile.parsed_cv_data));
            row.updated_at = now;
            Ok(row.clone())
        })
    }

    async fn delete_candidate(&self, id: Uuid) -> StoreResult<()> {
        self.with(|t| {
            let before = t.candidates.len();
            t.candidates.retain(|c| c.id != id);
            if t.candidates.len() == before {
                return Err(StoreError::candidate_not_found(id));
            }
            t.results.retain(|r| r.candidate_id != id);
            Ok(())
        })
    }

    async fn upsert_match_result(&self, result: NewMatchResult) -> StoreResult<MatchResultRow> {
        self.with(|t| {
            let now = t.now();
            let existing = t
                .results
                .iter()
                .position(|r| r.job_id == result.job_id && r.candidate_id == result.candidate_id);
            let (id, created_at, rank, is_in_longlist) = match existing {
                Some(index) => {
                    let r = &t.results[index];
                    (r.id, r.created_at, r.rank, r.is_in_longlist)
                }
                None => (Uuid::new_v4(), now, None, false),
            };
            let row = MatchResultRow {
                id,
                job_id: result.job_id,
                candidate_id: result.candidate_id,
                education_scores: Json(result.education_scores),
                education_total: result.education_total,
                experience_scores: Json(result.experience_scores),
                experience_total: result.experience_total,
                base_score: result.base_score,
                bonus_female: result.bonus_female,
                bonus_age: result.bonus_age,
                bonus_least_represented: result.bonus_least_represented,
                bonus_inclusion: result.bonus_inclusion,
                total_bonus: result.total_bonus,
                final_score: result.final_score,
                rank,
                is_in_longlist,
                passes_cutoff: result.passes_cutoff,
                overall_reasoning: result.overall_reasoning,
                strengths: Json(result.strengths),
                weaknesses: Json(result.weaknesses),
                flags: Json(result.flags),
                recommendations: result.recommendations,
                created_at,
                updated_at: now,
            };
            match existing {
                Some(index) => t.results[index] = row.clone(),
                None => t.results.push(row.clone()),
            }
            Ok(row)
        })
    }

    async fn find_match_result(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<MatchResultRow>> {
        self.with(|t| {
            Ok(t.results
                .iter()
                .find(|r| r.job_id == job_id && r.candidate_id == candidate_id)
                .cloned())
        })
    }

    async fn get_match_result(&self, id: Uuid) -> StoreResult<MatchResultRow> {
        self.with(|t| {
            t.results
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| StoreError::result_not_found(id))
        })
    }

    async fn list_match_results(&self, job_id: Uuid) -> StoreResult<Vec<MatchResultRow>> {
        self.with(|t| {
            let mut rows: Vec<MatchResultRow> = t
                .results
                .iter()
                .filter(|r| r.job_id == job_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                b.final_score
                    .total_cmp(&a.final_score)
                    .then(a.created_at.cmp(&b.created_at))
            });
            Ok(rows)
        })
    }

    async fn apply_ranks(&self, job_id: Uuid, ranks: &[RankAssignment]) -> StoreResult<()> {
        self.with(|t| {
            for assignment in ranks {
                if let Some(row) = t
                    .results
                    .iter_mut()
                    .find(|r| r.id == assignment.result_id && r.job_id == job_id)
                {
                    row.rank = Some(assignment.rank);
                    row.is_in_longlist = assignment.is_in_longlist;
                }
            }
            Ok(())
        })
    }
}
