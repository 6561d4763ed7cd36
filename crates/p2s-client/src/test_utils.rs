// In-process doubles for unit tests.
use async_trait::async_trait;
use p2s_api_types::{
    GenerationOptions, ResultBundle, SlideContentBundle, SlideRecord, StatusSnapshot,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{SlidesApi, Submission};
use crate::errors::{ClientError, ClientResult};
use crate::observer::{WorkflowObserver, WorkflowStep};

/// A [`SlidesApi`] that replays scripted responses and counts calls.
pub struct ScriptedApi {
    submission: ClientResult<Submission>,
    statuses: Mutex<VecDeque<ClientResult<StatusSnapshot>>>,
    repeat: Option<ClientResult<StatusSnapshot>>,
    results: ClientResult<ResultBundle>,
    content: ClientResult<SlideContentBundle>,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
    results_calls: AtomicUsize,
    content_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    submitted: Mutex<Vec<(Vec<PathBuf>, GenerationOptions)>>,
}

impl ScriptedApi {
    pub fn with_statuses(statuses: Vec<ClientResult<StatusSnapshot>>) -> Self {
        Self {
            submission: Ok(Submission {
                session_id: "3f2a9c1e-5b7d-4e21-9a0f-1c2d3e4f5a6b".to_string(),
                message: Some("Generation started".to_string()),
            }),
            statuses: Mutex::new(VecDeque::from(statuses)),
            repeat: None,
            results: Ok(ResultBundle::default()),
            content: Ok(content_bundle(3)),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            results_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Status returned once the scripted queue is drained.
    pub fn repeat_status(mut self, snapshot: StatusSnapshot) -> Self {
        self.repeat = Some(Ok(snapshot));
        self
    }

    pub fn repeat_error(mut self, error: ClientError) -> Self {
        self.repeat = Some(Err(error));
        self
    }

    pub fn with_submission(mut self, submission: ClientResult<Submission>) -> Self {
        self.submission = submission;
        self
    }

    pub fn with_results(mut self, results: ClientResult<ResultBundle>) -> Self {
        self.results = results;
        self
    }

    pub fn with_content(mut self, content: ClientResult<SlideContentBundle>) -> Self {
        self.content = content;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn results_calls(&self) -> usize {
        self.results_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(Vec<PathBuf>, GenerationOptions)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.submit_calls()
            + self.status_calls()
            + self.results_calls()
            + self.content_calls()
            + self.cancel_calls()
    }
}

#[async_trait]
impl SlidesApi for ScriptedApi {
    async fn submit(&self, files: &[PathBuf], options: &GenerationOptions) -> ClientResult<Submission> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap()
            .push((files.to_vec(), options.clone()));
        self.submission.clone()
    }

    async fn status(&self, _session_id: &str) -> ClientResult<StatusSnapshot> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(status) => status,
            None => self
                .repeat
                .clone()
                .unwrap_or_else(|| Err(ClientError::Network("no scripted status left".to_string()))),
        }
    }

    async fn results(&self, _session_id: &str) -> ClientResult<ResultBundle> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone()
    }

    async fn slide_content(&self, _session_id: &str) -> ClientResult<SlideContentBundle> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.content.clone()
    }

    async fn cancel(&self, _session_id: &str) -> ClientResult<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A content bundle with `count` numbered slides.
pub fn content_bundle(count: usize) -> SlideContentBundle {
    let slides = (1..=count as u32)
        .map(|number| SlideRecord {
            slide_number: number,
            title: format!("Slide {}", number),
            section_type: "body".to_string(),
            content: "Ngữ pháp thì hiện tại đơn".to_string(),
            image_url: Some(format!("/outputs/test/slide_{}.png", number)),
            tables: Vec::new(),
            figures: Vec::new(),
            extra: Default::default(),
        })
        .collect();

    SlideContentBundle {
        total_slides: count,
        output_type: "slides".to_string(),
        slides,
        extra: Default::default(),
    }
}

/// Observer that records what it was told.
#[derive(Default)]
pub struct RecordingObserver {
    steps: Mutex<Vec<WorkflowStep>>,
    status_changes: AtomicUsize,
    poll_errors: AtomicUsize,
    saved: Mutex<Vec<PathBuf>>,
}

impl RecordingObserver {
    pub fn steps(&self) -> Vec<WorkflowStep> {
        self.steps.lock().unwrap().clone()
    }

    pub fn status_changes(&self) -> usize {
        self.status_changes.load(Ordering::SeqCst)
    }

    pub fn poll_errors(&self) -> usize {
        self.poll_errors.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<PathBuf> {
        self.saved.lock().unwrap().clone()
    }
}

impl WorkflowObserver for RecordingObserver {
    fn on_step(&self, step: WorkflowStep) {
        self.steps.lock().unwrap().push(step);
    }

    fn on_status_changed(&self, _snapshot: &StatusSnapshot) {
        self.status_changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_poll_error(&self, _error: &ClientError) {
        self.poll_errors.fetch_add(1, Ordering::SeqCst);
    }

    fn on_completed(&self, _elapsed: Duration) {}

    fn on_saved(&self, path: &Path) {
        self.saved.lock().unwrap().push(path.to_path_buf());
    }
}
