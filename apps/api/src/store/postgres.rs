use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::CandidateRow;
use crate::models::criteria::JobCriteria;
use crate::models::job::{JobRow, JobStatus, JobSummary};
use crate::models::match_result::{MatchResultRow, RankAssignment};
use crate::store::{
    CandidateProfile, JobFilter, JobUpdate, NewCandidate, NewJob, NewMatchResult,
    ScreeningStore, StoreError, StoreResult,
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_duplicate(err: sqlx::Error, reference: Option<&str>) -> StoreError {
    match (&err, reference) {
        (sqlx::Error::Database(db_err), Some(reference)) if db_err.is_unique_violation() => {
            StoreError::DuplicateReference(reference.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl ScreeningStore for PgStore {
    async fn insert_job(&self, job: NewJob) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (title, reference_number, department, directorate, duty_station,
                 grade_level, description, raw_jd_text, min_pass_mark, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'draft')
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.reference_number)
        .bind(&job.department)
        .bind(&job.directorate)
        .bind(&job.duty_station)
        .bind(job.grade_level.as_str())
        .bind(&job.description)
        .bind(&job.raw_jd_text)
        .bind(job.grade_level.min_pass_mark())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_duplicate(e, job.reference_number.as_deref()))
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| StoreError::job_not_found(id))
    }

    async fn list_jobs(&self, filter: JobFilter) -> StoreResult<Vec<JobSummary>> {
        let rows = sqlx::query_as::<_, JobSummary>(
            r#"
            SELECT j.id, j.title, j.reference_number, j.grade_level, j.status, j.created_at,
                   (SELECT COUNT(*) FROM candidates c WHERE c.job_id = j.id) AS candidate_count
            FROM jobs j
            WHERE ($1::TEXT IS NULL OR j.status = $1)
            ORDER BY j.created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(filter.status.map(JobStatus::as_str))
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_job(&self, id: Uuid, update: JobUpdate) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title            = COALESCE($2, title),
                reference_number = COALESCE($3, reference_number),
                department       = COALESCE($4, department),
                duty_station     = COALESCE($5, duty_station),
                grade_level      = COALESCE($6, grade_level),
                min_pass_mark    = COALESCE($7, min_pass_mark),
                description      = COALESCE($8, description),
                status           = COALESCE($9, status),
                updated_at       = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.reference_number)
        .bind(&update.department)
        .bind(&update.duty_station)
        .bind(update.grade_level.map(|g| g.as_str()))
        .bind(update.grade_level.map(|g| g.min_pass_mark()))
        .bind(&update.description)
        .bind(update.status.map(JobStatus::as_str))
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_duplicate(e, update.reference_number.as_deref()))?
        .ok_or_else(|| StoreError::job_not_found(id))
    }

    async fn save_criteria(
        &self,
        id: Uuid,
        criteria: &JobCriteria,
        min_pass_mark: i32,
        status: JobStatus,
    ) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                education_criteria  = $2,
                experience_criteria = $3,
                min_pass_mark       = $4,
                status              = $5,
                updated_at          = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(&criteria.education_criteria))
        .bind(Json(&criteria.experience_criteria))
        .bind(min_pass_mark)
        .bind(status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::job_not_found(id))
    }

    async fn set_job_status(
        &self,
        id: Uuid,
        status: JobStatus,
        screening_completed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                status                 = $2,
                screening_completed_at = COALESCE($3, screening_completed_at),
                updated_at             = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(screening_completed_at)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::job_not_found(id))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::job_not_found(id));
        }
        Ok(())
    }

    async fn insert_candidate(&self, candidate: NewCandidate) -> StoreResult<CandidateRow> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates (job_id, full_name, cv_filename, cv_file_key, cv_raw_text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(candidate.job_id)
        .bind(&candidate.full_name)
        .bind(&candidate.cv_filename)
        .bind(&candidate.cv_file_key)
        .bind(&candidate.cv_raw_text)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<CandidateRow> {
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| StoreError::candidate_not_found(id))
    }

    async fn list_candidates(&self, job_id: Uuid) -> StoreResult<Vec<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE job_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(job_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn count_candidates(&self, job_id: Uuid) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn save_candidate_profile(
        &self,
        id: Uuid,
        profile: CandidateProfile,
    ) -> StoreResult<CandidateRow> {
        sqlx::query_as::<_, CandidateRow>(
            r#"
            UPDATE candidates SET
                full_name                    = $2,
                email                        = $3,
                phone                        = $4,
                gender                       = $5,
                date_of_birth                = $6,
                nationality                  = $7,
                country_of_residence         = $8,
                is_least_represented_country = $9,
                has_disability               = $10,
                disability_details           = $11,
                education                    = $12,
                experience                   = $13,
                skills                       = $14,
                certifications               = $15,
                languages                    = $16,
                parsed_cv_data               = $17,
                updated_at                   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(profile.gender.as_str())
        .bind(profile.date_of_birth)
        .bind(&profile.nationality)
        .bind(&profile.country_of_residence)
        .bind(profile.is_least_represented_country)
        .bind(profile.has_disability)
        .bind(&profile.disability_details)
        .bind(Json(&profile.education))
        .bind(Json(&profile.experience))
        .bind(Json(&profile.skills))
        .bind(Json(&profile.certifications))
        .bind(Json(&profile.languages))
        .bind(Json(&profile.parsed_cv_data))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::candidate_not_found(id))
    }

    async fn delete_candidate(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::candidate_not_found(id));
        }
        Ok(())
    }

    async fn upsert_match_result(&self, result: NewMatchResult) -> StoreResult<MatchResultRow> {
        let row = sqlx::query_as::<_, MatchResultRow>(
            r#"
            INSERT INTO match_results
                (job_id, candidate_id, education_scores, education_total,
                 experience_scores, experience_total, base_score,
                 bonus_female, bonus_age, bonus_least_represented, bonus_inclusion,
                 total_bonus, final_score, passes_cutoff,
                 overall_reasoning, strengths, weaknesses, flags, recommendations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19)
            ON CONFLICT (job_id, candidate_id) DO UPDATE SET
                education_scores        = EXCLUDED.education_scores,
                education_total         = EXCLUDED.education_total,
                experience_scores       = EXCLUDED.experience_scores,
                experience_total        = EXCLUDED.experience_total,
                base_score              = EXCLUDED.base_score,
                bonus_female            = EXCLUDED.bonus_female,
                bonus_age               = EXCLUDED.bonus_age,
                bonus_least_represented = EXCLUDED.bonus_least_represented,
                bonus_inclusion         = EXCLUDED.bonus_inclusion,
                total_bonus             = EXCLUDED.total_bonus,
                final_score             = EXCLUDED.final_score,
                passes_cutoff           = EXCLUDED.passes_cutoff,
                overall_reasoning       = EXCLUDED.overall_reasoning,
                strengths               = EXCLUDED.strengths,
                weaknesses              = EXCLUDED.weaknesses,
                flags                   = EXCLUDED.flags,
                recommendations         = EXCLUDED.recommendations,
                updated_at              = now()
            RETURNING *
            "#,
        )
        .bind(result.job_id)
        .bind(result.candidate_id)
        .bind(Json(&result.education_scores))
        .bind(result.education_total)
        .bind(Json(&result.experience_scores))
        .bind(result.experience_total)
        .bind(result.base_score)
        .bind(result.bonus_female)
        .bind(result.bonus_age)
        .bind(result.bonus_least_represented)
        .bind(result.bonus_inclusion)
        .bind(result.total_bonus)
        .bind(result.final_score)
        .bind(result.passes_cutoff)
        .bind(&result.overall_reasoning)
        .bind(Json(&result.strengths))
        .bind(Json(&result.weaknesses))
        .bind(Json(&result.flags))
        .bind(&result.recommendations)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_match_result(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Option<MatchResultRow>> {
        let row = sqlx::query_as::<_, MatchResultRow>(
            "SELECT * FROM match_results WHERE job_id = $1 AND candidate_id = $2",
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn get_match_result(&self, id: Uuid) -> StoreResult<MatchResultRow> {
        sqlx::query_as::<_, MatchResultRow>("SELECT * FROM match_results WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| StoreError::result_not_found(id))
    }

    async fn list_match_results(&self, job_id: Uuid) -> StoreResult<Vec<MatchResultRow>> {
        let rows = sqlx::query_as::<_, MatchResultRow>(
            r#"
            SELECT * FROM match_results
            WHERE job_id = $1
            ORDER BY final_score DESC, created_at ASC, id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn apply_ranks(&self, job_id: Uuid, ranks: &[RankAssignment]) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        for assignment in ranks {
            sqlx::query(
                r#"
                UPDATE match_results
                SET rank = $1, is_in_longlist = $2, updated_at = now()
                WHERE id = $3 AND job_id = $4
                "#,
            )
            .bind(assignment.rank)
            .bind(assignment.is_in_longlist)
            .bind(assignment.result_id)
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!("Applied {} ranks for job {job_id}", ranks.len());
        Ok(())
    }
}
