use async_trait::async_trait;
use p2s_api_types::{GenerationOptions, ResultBundle, SlideContentBundle, StatusSnapshot};
use std::path::PathBuf;

use crate::errors::ClientResult;

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Non-empty session handle.
    pub session_id: String,
    pub message: Option<String>,
}

/// The HTTP surface of the generation service.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait SlidesApi: Send + Sync {
    /// Upload documents and start a generation session.
    async fn submit(&self, files: &[PathBuf], options: &GenerationOptions) -> ClientResult<Submission>;

    /// Read the current status of a session.
    async fn status(&self, session_id: &str) -> ClientResult<StatusSnapshot>;

    /// Fetch the result bundle of a completed session.
    async fn results(&self, session_id: &str) -> ClientResult<ResultBundle>;

    /// Fetch the structured slide content of a completed session.
    async fn slide_content(&self, session_id: &str) -> ClientResult<SlideContentBundle>;

    /// Ask the service to stop a running session.
    async fn cancel(&self, session_id: &str) -> ClientResult<()>;
}
