use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{ensure_supported, extract_text_blocking};
use crate::files::delete_quietly;
use crate::matching::statistics::ScreeningStatistics;
use crate::models::job::{GradeLevel, JobRow, JobStatus, JobSummary, DEFAULT_DIRECTORATE};
use crate::state::AppState;
use crate::store::{JobFilter, JobUpdate, NewJob};
use crate::uploads::read_single_file;

// ─── Requests / responses ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadJdResponse {
    pub text: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub reference_number: Option<String>,
    pub department: Option<String>,
    pub directorate: Option<String>,
    pub duty_station: Option<String>,
    pub grade_level: GradeLevel,
    pub description: Option<String>,
    pub raw_jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub reference_number: Option<String>,
    pub department: Option<String>,
    pub duty_station: Option<String>,
    pub grade_level: Option<GradeLevel>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProcessJobResponse {
    pub message: String,
    pub job_id: Uuid,
    pub education_criteria_count: usize,
    pub experience_criteria_count: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// POST /api/jobs/upload-jd
/// Extracts text from a job description file without creating anything.
pub async fn handle_upload_jd(
    mut multipart: Multipart,
) -> Result<Json<UploadJdResponse>, AppError> {
    let file = read_single_file(&mut multipart).await?;
    ensure_supported(&file.filename)?;
    let text = extract_text_blocking(file.bytes, file.filename.clone()).await?;
    Ok(Json(UploadJdResponse {
        text,
        filename: file.filename,
    }))
}

/// POST /api/jobs
/// Creates the job and immediately extracts its criteria.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required".to_string()));
    }
    if req.raw_jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description text is required".to_string(),
        ));
    }

    let job = state
        .store
        .insert_job(NewJob {
            title: req.title.trim().to_string(),
            reference_number: non_blank(req.reference_number),
            department: req.department,
            directorate: non_blank(req.directorate)
                .unwrap_or_else(|| DEFAULT_DIRECTORATE.to_string()),
            duty_station: req.duty_station,
            grade_level: req.grade_level,
            description: req.description,
            raw_jd_text: req.raw_jd_text,
        })
        .await?;
    info!("Created job {} ({})", job.id, job.title);

    let job = state.matching.process_job_description(&job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<Vec<JobSummary>>, AppError> {
    let jobs = state
        .store
        .list_jobs(JobFilter {
            status: params.status,
            skip: params.skip.max(0),
            limit: params.limit.clamp(0, 1000),
        })
        .await?;
    Ok(Json(jobs))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(state.store.get_job(id).await?))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = state
        .store
        .update_job(
            id,
            JobUpdate {
                title: req.title,
                reference_number: req.reference_number,
                department: req.department,
                duty_station: req.duty_station,
                grade_level: req.grade_level,
                description: req.description,
                status: req.status,
            },
        )
        .await?;
    Ok(Json(job))
}

/// DELETE /api/jobs/:id
/// Removes the job, its candidates and results, then their stored CVs.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let keys: Vec<String> = state
        .store
        .list_candidates(id)
        .await?
        .into_iter()
        .filter_map(|c| c.cv_file_key)
        .collect();

    state.store.delete_job(id).await?;
    for key in &keys {
        delete_quietly(state.files.as_ref(), Some(key)).await;
    }
    info!("Deleted job {id} and {} stored CVs", keys.len());
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/jobs/:id/process
pub async fn handle_process_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProcessJobResponse>, AppError> {
    let job = state.store.get_job(id).await?;
    let job = state.matching.process_job_description(&job).await?;
    Ok(Json(ProcessJobResponse {
        message: "Job description processed successfully".to_string(),
        job_id: job.id,
        education_criteria_count: job.education_criteria.0.len(),
        experience_criteria_count: job.experience_criteria.0.len(),
    }))
}

/// GET /api/jobs/:id/statistics
pub async fn handle_job_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScreeningStatistics>, AppError> {
    Ok(Json(state.matching.get_statistics(id).await?))
}

/// POST /api/jobs/:id/complete
pub async fn handle_complete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(state.matching.complete_screening(id).await?))
}

/// POST /api/jobs/:id/archive
pub async fn handle_archive_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(state.matching.archive_job(id).await?))
}
