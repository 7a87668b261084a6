//! Multipart file reading shared by the JD and CV upload endpoints.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Collects every multipart field that carries a filename. Plain form fields
/// are skipped.
pub async fn read_files(multipart: &mut Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read '{filename}': {e}")))?;
        files.push(UploadedFile { filename, bytes });
    }
    Ok(files)
}

/// Exactly one file is expected.
pub async fn read_single_file(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    read_files(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))
}
