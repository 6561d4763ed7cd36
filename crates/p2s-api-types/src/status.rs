//! Job status types returned by `GET /api/status/{session_id}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall status of a generation session.
///
/// Values the service may add later are kept verbatim in [`JobStatus::Other`]
/// instead of failing the decode, so a newer server does not break polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Accepted but not started.
    Pending,
    /// At least one stage is executing.
    Running,
    /// All stages finished; results are available.
    Completed,
    /// The job stopped with an error.
    Failed,
    /// A status string this client does not know.
    Other(String),
}

impl JobStatus {
    /// Whether the status ends the session (`completed` or `failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(value) => value,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single pipeline stage.
///
/// The service reports stage values with the same vocabulary as the job
/// status, so the same type is reused.
pub type StageStatus = JobStatus;

/// The pipeline stages exposed by the service, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageName {
    /// Knowledge graph construction from the uploaded documents.
    Rag,
    /// Content extraction and summarization.
    Summary,
    /// Section and layout planning.
    Plan,
    /// Rendering of the final slides or poster.
    Generate,
}

impl StageName {
    /// All stages in the order the service runs them.
    pub const ALL: [StageName; 4] = [
        StageName::Rag,
        StageName::Summary,
        StageName::Plan,
        StageName::Generate,
    ];

    /// Key used for this stage in the `stages` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Rag => "rag",
            StageName::Summary => "summary",
            StageName::Plan => "plan",
            StageName::Generate => "generate",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time read of a session's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Overall job status.
    pub status: JobStatus,
    /// Per-stage status keyed by stage name.
    #[serde(default)]
    pub stages: BTreeMap<String, StageStatus>,
    /// Error text supplied by the service when the job failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Create a snapshot with no stage information.
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            stages: BTreeMap::new(),
            error: None,
        }
    }

    /// Set the status of one stage.
    pub fn with_stage(mut self, stage: StageName, status: StageStatus) -> Self {
        self.stages.insert(stage.as_str().to_string(), status);
        self
    }

    /// Set the error text.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Status of a stage; stages the service has not reported yet are pending.
    pub fn stage(&self, stage: StageName) -> StageStatus {
        self.stages
            .get(stage.as_str())
            .cloned()
            .unwrap_or(JobStatus::Pending)
    }

    /// The error text for a failed job, falling back to a generic message.
    pub fn failure_message(&self) -> String {
        match self.error.as_deref() {
            Some(error) if !error.is_empty() => error.to_string(),
            _ => "Unknown error".to_string(),
        }
    }
}
