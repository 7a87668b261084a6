use std::sync::Arc;

use crate::files::CvFileStore;
use crate::matching::MatchingService;
use crate::store::ScreeningStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScreeningStore>,
    pub matching: Arc<MatchingService>,
    /// Original CV uploads. S3 in production.
    pub files: Arc<dyn CvFileStore>,
}
