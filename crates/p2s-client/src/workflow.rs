//! The generation workflow: submit, poll, fetch results, fetch content.
//!
//! Steps run strictly in sequence and the first failing step ends the run;
//! no later step is attempted. The session identifier returned by the
//! submission is the only state threaded between steps.

use p2s_api_types::{GenerationOptions, ResultBundle, SlideContentBundle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{SlidesApi, Submission};
use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::observer::{WorkflowObserver, WorkflowStep};
use crate::persist;
use crate::polling::{poll_until_terminal, PollOutcome, PollPolicy};

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub session_id: String,
    pub generation_time: Duration,
    pub results: ResultBundle,
    pub content: SlideContentBundle,
    /// Where the content bundle was written, if saving was enabled and succeeded.
    pub saved_to: Option<PathBuf>,
}

/// A failed run: the error and the step it happened in.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowFailure {
    pub step: WorkflowStep,
    /// Set once the submission succeeded.
    pub session_id: Option<String>,
    pub error: ClientError,
}

impl std::fmt::Display for WorkflowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed at {} stage: {}", self.step.failure_stage(), self.error)
    }
}

impl std::error::Error for WorkflowFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Drives one generation session against a [`SlidesApi`].
pub struct WorkflowDriver {
    api: Arc<dyn SlidesApi>,
    options: GenerationOptions,
    policy: PollPolicy,
    output_dir: Option<PathBuf>,
}

impl WorkflowDriver {
    pub fn new(api: Arc<dyn SlidesApi>, options: GenerationOptions, policy: PollPolicy) -> Self {
        Self {
            api,
            options,
            policy,
            output_dir: None,
        }
    }

    /// Build a driver from a validated configuration.
    pub fn from_config(api: Arc<dyn SlidesApi>, config: &ClientConfig) -> Self {
        let driver = Self::new(
            api,
            config.generation.clone(),
            PollPolicy::from(&config.polling),
        );
        if config.output.save_content {
            driver.with_output_dir(config.output.directory.clone())
        } else {
            driver
        }
    }

    /// Save the slide content bundle into `dir` after it is fetched.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn api(&self) -> Arc<dyn SlidesApi> {
        Arc::clone(&self.api)
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Step 1. Fails with [`ClientError::Input`] before any request when a
    /// file is missing.
    pub async fn submit(
        &self,
        files: &[PathBuf],
        observer: &dyn WorkflowObserver,
    ) -> ClientResult<Submission> {
        validate_inputs(files)?;

        log::info!("Uploading {} file(s)", files.len());
        let submission = self.api.submit(files, &self.options).await?;
        log::info!("Upload accepted, session {}", submission.session_id);

        observer.on_submitted(&submission.session_id, submission.message.as_deref());
        Ok(submission)
    }

    /// Step 2.
    pub async fn poll(
        &self,
        session_id: &str,
        observer: &dyn WorkflowObserver,
    ) -> ClientResult<PollOutcome> {
        let outcome = poll_until_terminal(self.api.as_ref(), session_id, &self.policy, observer).await?;
        observer.on_completed(outcome.elapsed);
        Ok(outcome)
    }

    /// Step 3.
    pub async fn fetch_results(
        &self,
        session_id: &str,
        observer: &dyn WorkflowObserver,
    ) -> ClientResult<ResultBundle> {
        let results = self.api.results(session_id).await?;
        log::info!("Session {} produced {} slide(s)", session_id, results.slides.len());
        observer.on_results(&results);
        Ok(results)
    }

    /// Step 4. Saving is a side effect: a write failure is logged and the
    /// step still succeeds.
    pub async fn fetch_slide_content(
        &self,
        session_id: &str,
        observer: &dyn WorkflowObserver,
    ) -> ClientResult<(SlideContentBundle, Option<PathBuf>)> {
        let content = self.api.slide_content(session_id).await?;
        log::info!(
            "Session {} content: {} {}",
            session_id,
            content.total_slides,
            content.output_type
        );
        observer.on_content(&content);

        let saved_to = match &self.output_dir {
            Some(dir) => match persist::save_content(dir, session_id, &content).await {
                Ok(path) => {
                    observer.on_saved(&path);
                    Some(path)
                }
                Err(e) => {
                    log::error!("Failed to save slide content to {}: {}", dir.display(), e);
                    None
                }
            },
            None => None,
        };

        Ok((content, saved_to))
    }

    /// Run all four steps in order, stopping at the first failure.
    pub async fn run(
        &self,
        files: &[PathBuf],
        observer: &dyn WorkflowObserver,
    ) -> Result<WorkflowReport, WorkflowFailure> {
        let fail = |step: WorkflowStep, session_id: Option<&str>| {
            let session_id = session_id.map(str::to_string);
            move |error: ClientError| WorkflowFailure {
                step,
                session_id,
                error,
            }
        };

        observer.on_step(WorkflowStep::Submit);
        let submission = self
            .submit(files, observer)
            .await
            .map_err(fail(WorkflowStep::Submit, None))?;
        let session_id = submission.session_id.as_str();

        observer.on_step(WorkflowStep::Poll);
        let outcome = self
            .poll(session_id, observer)
            .await
            .map_err(fail(WorkflowStep::Poll, Some(session_id)))?;

        observer.on_step(WorkflowStep::FetchResults);
        let results = self
            .fetch_results(session_id, observer)
            .await
            .map_err(fail(WorkflowStep::FetchResults, Some(session_id)))?;

        observer.on_step(WorkflowStep::FetchContent);
        let (content, saved_to) = self
            .fetch_slide_content(session_id, observer)
            .await
            .map_err(fail(WorkflowStep::FetchContent, Some(session_id)))?;

        Ok(WorkflowReport {
            session_id: submission.session_id.clone(),
            generation_time: outcome.elapsed,
            results,
            content,
            saved_to,
        })
    }
}

/// Check that every upload exists and is a regular file.
pub fn validate_inputs(files: &[PathBuf]) -> ClientResult<()> {
    if files.is_empty() {
        return Err(ClientError::Input("No input files given".to_string()));
    }

    for path in files {
        check_file(path)?;
    }
    Ok(())
}

fn check_file(path: &Path) -> ClientResult<()> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(ClientError::Input(format!("Not a regular file: {}", path.display()))),
        Err(_) => Err(ClientError::Input(format!("File not found: {}", path.display()))),
    }
}
