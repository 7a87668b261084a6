use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::candidates::upload::ingest_cv;
use crate::errors::AppError;
use crate::files::delete_quietly;
use crate::models::candidate::{CandidateRow, Gender};
use crate::models::match_result::MatchResultRow;
use crate::state::AppState;
use crate::uploads::{read_files, read_single_file};

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub candidate_id: Uuid,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedEntry {
    pub filename: String,
    pub candidate_id: Uuid,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FailedEntry {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub message: String,
    pub successful: Vec<UploadedEntry>,
    pub errors: Vec<FailedEntry>,
}

/// POST /api/candidates/:job_id/upload
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    state.store.get_job(job_id).await?;
    let file = read_single_file(&mut multipart).await?;
    let filename = file.filename.clone();
    let candidate = ingest_cv(&state, job_id, file).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "CV uploaded successfully".to_string(),
            candidate_id: candidate.id,
            filename,
        }),
    ))
}

/// POST /api/candidates/:job_id/upload-bulk
/// Every file is ingested independently; failures are reported per file.
pub async fn handle_upload_bulk(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<BulkUploadResponse>, AppError> {
    state.store.get_job(job_id).await?;
    let files = read_files(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }

    let mut successful = Vec::new();
    let mut errors = Vec::new();
    for file in files {
        let filename = file.filename.clone();
        match ingest_cv(&state, job_id, file).await {
            Ok(candidate) => successful.push(UploadedEntry {
                filename,
                candidate_id: candidate.id,
                status: "uploaded",
            }),
            Err(e) => {
                warn!("Bulk upload of '{filename}' failed: {e}");
                errors.push(FailedEntry {
                    filename,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(Json(BulkUploadResponse {
        message: format!("Uploaded {} CVs", successful.len()),
        successful,
        errors,
    }))
}

// ─── Screening ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProcessAllResponse {
    pub message: String,
    pub job_id: Uuid,
    pub candidates_processed: usize,
    pub longlist_count: usize,
}

/// POST /api/candidates/:job_id/process-all
pub async fn handle_process_all(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ProcessAllResponse>, AppError> {
    let outcome = state.matching.process_all_candidates(job_id).await?;
    Ok(Json(ProcessAllResponse {
        message: "All candidates processed successfully".to_string(),
        job_id,
        candidates_processed: outcome.candidates_processed,
        longlist_count: outcome.results.iter().filter(|r| r.is_in_longlist).count(),
    }))
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CandidateWithAge {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub age: Option<u32>,
}

/// GET /api/candidates/:job_id/list
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateWithAge>>, AppError> {
    state.store.get_job(job_id).await?;
    let candidates = state
        .store
        .list_candidates(job_id)
        .await?
        .into_iter()
        .map(|candidate| CandidateWithAge {
            age: candidate.age(),
            candidate,
        })
        .collect();
    Ok(Json(candidates))
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    #[serde(default = "default_results_limit")]
    pub limit: usize,
    #[serde(default)]
    pub longlist_only: bool,
}

fn default_results_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
pub struct ResultWithCandidate {
    #[serde(flatten)]
    pub result: MatchResultRow,
    pub candidate_name: Option<String>,
    pub candidate_gender: Option<Gender>,
    pub candidate_nationality: Option<String>,
}

/// GET /api/candidates/:job_id/results
/// Ranked by final score.
pub async fn handle_list_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<Vec<ResultWithCandidate>>, AppError> {
    state.store.get_job(job_id).await?;
    let candidates = state.store.list_candidates(job_id).await?;
    let results = state
        .store
        .list_match_results(job_id)
        .await?
        .into_iter()
        .filter(|r| !params.longlist_only || r.is_in_longlist)
        .take(params.limit)
        .map(|result| {
            let candidate = candidates.iter().find(|c| c.id == result.candidate_id);
            ResultWithCandidate {
                candidate_name: candidate.map(|c| c.full_name.clone()),
                candidate_gender: candidate.map(|c| c.gender),
                candidate_nationality: candidate.and_then(|c| c.nationality.clone()),
                result,
            }
        })
        .collect();
    Ok(Json(results))
}

/// GET /api/candidates/result/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchResultRow>, AppError> {
    Ok(Json(state.store.get_match_result(id).await?))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let candidate = state.store.get_candidate(id).await?;
    state.store.delete_candidate(id).await?;
    delete_quietly(state.files.as_ref(), candidate.cv_file_key.as_deref()).await;
    Ok(StatusCode::NO_CONTENT)
}
