//! Storage for original CV uploads (S3 / MinIO).

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("File storage error: {0}")]
pub struct FileStoreError(pub String);

#[async_trait]
pub trait CvFileStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), FileStoreError>;
    async fn delete(&self, key: &str) -> Result<(), FileStoreError>;
}

/// `cvs/<job_id>/<timestamp>_<filename>`. Microsecond timestamps keep keys
/// distinct inside a bulk upload.
pub fn object_key(job_id: Uuid, filename: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S_%6f");
    format!("cvs/{job_id}/{timestamp}_{filename}")
}

pub fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}

/// Best-effort removal: failures are logged, never returned.
pub async fn delete_quietly(files: &dyn CvFileStore, key: Option<&str>) {
    if let Some(key) = key {
        if let Err(e) = files.delete(key).await {
            warn!("Could not delete stored CV {key}: {e}");
        }
    }
}

pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl CvFileStore for S3FileStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FileStoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| FileStoreError(format!("S3 upload failed: {e}")))?;
        info!("Uploaded CV to s3://{}/{key}", self.bucket);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), FileStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| FileStoreError(format!("S3 delete failed: {e}")))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let job_id = Uuid::new_v4();
        let key = object_key(job_id, "Amina Diallo CV.pdf");
        let prefix = format!("cvs/{job_id}/");
        assert!(key.starts_with(&prefix), "{key}");
        assert!(key.ends_with("_Amina Diallo CV.pdf"), "{key}");
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for("cv.PDF"), "application/pdf");
        assert_eq!(content_type_for("cv.doc"), "application/msword");
        assert!(content_type_for("cv.docx").contains("wordprocessingml"));
    }

    #[tokio::test]
    async fn test_delete_quietly_swallows_missing_key() {
        let files = memory::MemoryFileStore::default();
        delete_quietly(&files, Some("cvs/missing.pdf")).await;
        delete_quietly(&files, None).await;
        assert!(files.keys().is_empty());
    }
}
