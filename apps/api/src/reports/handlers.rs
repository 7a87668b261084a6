use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::LONGLIST_SIZE;
use crate::models::job::JobRow;
use crate::reports::candidate::render_candidate_report;
use crate::reports::docx::DOCX_CONTENT_TYPE;
use crate::reports::longlist::render_longlist_report;
use crate::reports::spreadsheet::{render_rankings_csv, CSV_CONTENT_TYPE};
use crate::reports::{file_slug, join_ranked, RankedEntry};
use crate::state::AppState;

fn attachment(content_type: &'static str, filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// `<reference or id>_<title>` for report filenames.
fn job_file_stem(job: &JobRow) -> String {
    let reference = job
        .reference_number
        .clone()
        .unwrap_or_else(|| job.id.to_string());
    format!("{}_{}", file_slug(&reference), file_slug(&job.title))
}

async fn load_all_ranked(
    state: &AppState,
    job_id: Uuid,
) -> Result<(JobRow, Vec<RankedEntry>), AppError> {
    let job = state.store.get_job(job_id).await?;
    let results = state.store.list_match_results(job_id).await?;
    let candidates = state.store.list_candidates(job_id).await?;
    Ok((job, join_ranked(results, candidates)))
}

/// GET /api/reports/:job_id/longlist/docx
pub async fn handle_longlist_docx(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = state.store.get_job(job_id).await?;
    let longlist = state.matching.get_longlist(job_id, LONGLIST_SIZE).await?;
    let entries = join_ranked(longlist, state.store.list_candidates(job_id).await?);
    let total = state.store.count_candidates(job_id).await?;
    let bytes = render_longlist_report(&job, &entries, total, Utc::now())?;
    Ok(attachment(
        DOCX_CONTENT_TYPE,
        format!("longlist_report_{}.docx", job_file_stem(&job)),
        bytes,
    ))
}

/// GET /api/reports/:job_id/longlist/csv
pub async fn handle_rankings_csv(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (job, entries) = load_all_ranked(&state, job_id).await?;
    let bytes = render_rankings_csv(&entries)?;
    Ok(attachment(
        CSV_CONTENT_TYPE,
        format!("candidate_rankings_{}.csv", job_file_stem(&job)),
        bytes,
    ))
}

/// GET /api/reports/candidate/:result_id/docx
pub async fn handle_candidate_docx(
    State(state): State<AppState>,
    Path(result_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let result = state.store.get_match_result(result_id).await?;
    let job = state.store.get_job(result.job_id).await?;
    let candidate = state.store.get_candidate(result.candidate_id).await?;
    let bytes = render_candidate_report(&job, &candidate, &result, Utc::now())?;
    Ok(attachment(
        DOCX_CONTENT_TYPE,
        format!("evaluation_report_{}.docx", file_slug(&candidate.full_name)),
        bytes,
    ))
}
