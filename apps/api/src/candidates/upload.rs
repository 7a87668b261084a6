//! CV ingestion: extension check, text extraction, object storage, candidate row.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{ensure_supported, extract_text_blocking};
use crate::files::{content_type_for, delete_quietly, object_key};
use crate::models::candidate::CandidateRow;
use crate::state::AppState;
use crate::store::NewCandidate;
use crate::uploads::UploadedFile;

/// Display name used until the CV is parsed: the filename without its last
/// extension.
pub fn name_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

/// Stores one uploaded CV for `job_id`. The stored object is removed again if
/// the candidate row cannot be written.
pub async fn ingest_cv(
    state: &AppState,
    job_id: Uuid,
    file: UploadedFile,
) -> Result<CandidateRow, AppError> {
    ensure_supported(&file.filename)?;
    let text = extract_text_blocking(file.bytes.clone(), file.filename.clone()).await?;
    if text.is_empty() {
        warn!("No text extracted from '{}'", file.filename);
    }

    let key = object_key(job_id, &file.filename);
    state
        .files
        .put(&key, file.bytes.to_vec(), content_type_for(&file.filename))
        .await?;

    let inserted = state
        .store
        .insert_candidate(NewCandidate {
            job_id,
            full_name: name_from_filename(&file.filename),
            cv_filename: file.filename.clone(),
            cv_file_key: Some(key.clone()),
            cv_raw_text: text,
        })
        .await;

    match inserted {
        Ok(candidate) => {
            info!(
                "Stored CV '{}' as candidate {} for job {job_id}",
                file.filename, candidate.id
            );
            Ok(candidate)
        }
        Err(e) => {
            delete_quietly(state.files.as_ref(), Some(&key)).await;
            Err(e.into())
        }
    }
}
