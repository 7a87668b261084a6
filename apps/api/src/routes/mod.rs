pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::reports::handlers as reports;
use crate::state::AppState;

/// Bulk CV uploads carry many files in one request.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/jobs/upload-jd", post(jobs::handle_upload_jd))
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/jobs/:id/process", post(jobs::handle_process_job))
        .route("/api/jobs/:id/statistics", get(jobs::handle_job_statistics))
        .route("/api/jobs/:id/complete", post(jobs::handle_complete_job))
        .route("/api/jobs/:id/archive", post(jobs::handle_archive_job))
        // Candidates (the job id and candidate id share the `:id` segment)
        .route("/api/candidates/:id/upload", post(candidates::handle_upload_cv))
        .route(
            "/api/candidates/:id/upload-bulk",
            post(candidates::handle_upload_bulk),
        )
        .route(
            "/api/candidates/:id/process-all",
            post(candidates::handle_process_all),
        )
        .route(
            "/api/candidates/:id/list",
            get(candidates::handle_list_candidates),
        )
        .route(
            "/api/candidates/:id/results",
            get(candidates::handle_list_results),
        )
        .route(
            "/api/candidates/result/:id",
            get(candidates::handle_get_result),
        )
        .route(
            "/api/candidates/:id",
            delete(candidates::handle_delete_candidate),
        )
        // Reports
        .route(
            "/api/reports/:id/longlist/docx",
            get(reports::handle_longlist_docx),
        )
        .route(
            "/api/reports/:id/longlist/csv",
            get(reports::handle_rankings_csv),
        )
        .route(
            "/api/reports/candidate/:id/docx",
            get(reports::handle_candidate_docx),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
