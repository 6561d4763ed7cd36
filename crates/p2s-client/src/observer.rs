//! Progress notifications emitted by the workflow driver.
//!
//! Observers exist for display only. Nothing they do feeds back into the
//! workflow's control flow.

use p2s_api_types::{ResultBundle, SlideContentBundle, StatusSnapshot};
use std::path::Path;
use std::time::Duration;

use crate::errors::ClientError;

/// The four sequential steps of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Submit,
    Poll,
    FetchResults,
    FetchContent,
}

impl WorkflowStep {
    pub fn number(&self) -> u8 {
        match self {
            WorkflowStep::Submit => 1,
            WorkflowStep::Poll => 2,
            WorkflowStep::FetchResults => 3,
            WorkflowStep::FetchContent => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStep::Submit => "Upload Documents and Start Generation",
            WorkflowStep::Poll => "Monitor Generation Progress",
            WorkflowStep::FetchResults => "Retrieve Generated Results",
            WorkflowStep::FetchContent => "Get Structured Slide Content",
        }
    }

    /// Stage label used when reporting which step a run failed at.
    pub fn failure_stage(&self) -> &'static str {
        match self {
            WorkflowStep::Submit => "upload",
            WorkflowStep::Poll => "generation",
            WorkflowStep::FetchResults => "results retrieval",
            WorkflowStep::FetchContent => "content extraction",
        }
    }
}

/// Receives progress notifications from [`crate::WorkflowDriver`].
pub trait WorkflowObserver: Send + Sync {
    fn on_step(&self, _step: WorkflowStep) {}

    fn on_submitted(&self, _session_id: &str, _message: Option<&str>) {}

    /// Called once per distinct snapshot; repeats of the previous snapshot
    /// are not reported.
    fn on_status_changed(&self, _snapshot: &StatusSnapshot) {}

    /// A status check failed and will be retried.
    fn on_poll_error(&self, _error: &ClientError) {}

    fn on_completed(&self, _elapsed: Duration) {}

    fn on_results(&self, _results: &ResultBundle) {}

    fn on_content(&self, _content: &SlideContentBundle) {}

    fn on_saved(&self, _path: &Path) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}
