use std::sync::Arc;

use tokio::sync::Mutex;

use crate::interview::InterviewSession;
use crate::keywords::KeywordExtractor;
use crate::tasks::TaskRunner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskRunner,
    /// NER keyword extractor; `None` when the model could not be loaded and
    /// keyword extraction is disabled.
    pub keywords: Option<Arc<KeywordExtractor>>,
    /// The single live interview session. All mutations run to completion
    /// under this lock, a single-writer discipline over the turn sequence.
    pub interview: Arc<Mutex<Option<InterviewSession>>>,
}
