//! Console progress output.
//!
//! [`ConsoleObserver`] turns workflow notifications into the step headers,
//! stage lines and previews shown to the user. It also remembers the session
//! id so the interrupt handler can cancel the session.

use crossterm::style::{Color, Stylize};
use p2s_api_types::{
    Attachment, JobStatus, OutputType, ResultBundle, SlideContentBundle, StageName, StatusSnapshot,
};
use p2s_client::{
    ClientConfig, ClientError, HttpSlidesClient, WorkflowFailure, WorkflowObserver, WorkflowReport,
    WorkflowStep,
};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RULE_WIDTH: usize = 80;
const PREVIEW_COUNT: usize = 3;
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Session id shared between the observer and the interrupt path.
pub type SessionSlot = Arc<Mutex<Option<String>>>;

pub struct ConsoleObserver {
    client: Arc<HttpSlidesClient>,
    color: bool,
    session: SessionSlot,
    config: ClientConfig,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleObserver {
    pub fn new(client: Arc<HttpSlidesClient>, config: &ClientConfig) -> Self {
        let color = std::env::var_os("NO_COLOR").is_none();
        Self::with_writer(client, config, Box::new(io::stdout()), color)
    }

    pub fn with_writer(
        client: Arc<HttpSlidesClient>,
        config: &ClientConfig,
        out: Box<dyn Write + Send>,
        color: bool,
    ) -> Self {
        Self {
            client,
            color,
            session: Arc::new(Mutex::new(None)),
            config: config.clone(),
            out: Mutex::new(out),
        }
    }

    pub fn session_slot(&self) -> SessionSlot {
        Arc::clone(&self.session)
    }

    fn paint(&self, text: impl Display, color: Color, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = text.to_string().with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }

    fn line(&self, text: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            // Progress output is best effort; a closed stdout must not
            // abort the run.
            let _ = writeln!(out, "{}", text);
        }
    }

    pub fn header(&self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line("");
        self.line(self.paint(&rule, Color::Magenta, true));
        self.line(self.paint(format!("{:^width$}", title, width = RULE_WIDTH), Color::Magenta, true));
        self.line(self.paint(&rule, Color::Magenta, true));
        self.line("");
    }

    pub fn info(&self, text: impl Display) {
        self.line(self.paint(format!("ℹ {}", text), Color::Blue, false));
    }

    pub fn success(&self, text: impl Display) {
        self.line(self.paint(format!("✓ {}", text), Color::Green, false));
    }

    pub fn warning(&self, text: impl Display) {
        self.line(self.paint(format!("⚠ {}", text), Color::Yellow, false));
    }

    pub fn error(&self, text: impl Display) {
        self.line(self.paint(format!("✗ {}", text), Color::Red, false));
    }

    fn stage_icon(&self, status: &JobStatus) -> String {
        match status {
            JobStatus::Pending => self.paint("⏸", Color::Yellow, false),
            JobStatus::Running => self.paint("▶", Color::Cyan, false),
            JobStatus::Completed => self.paint("✓", Color::Green, false),
            JobStatus::Failed => self.paint("✗", Color::Red, false),
            JobStatus::Other(_) => "?".to_string(),
        }
    }

    /// Opening banner with the service address and input files.
    pub fn banner(&self) {
        self.header("Paper2Slides API Client");
        self.info(format!("API Base URL: {}", self.client.base_url()));
        for file in &self.config.files {
            self.info(format!("Input: {}", file.display()));
        }
    }

    pub fn summary(&self, report: &WorkflowReport) {
        self.header("GENERATION COMPLETED SUCCESSFULLY");
        self.success("All workflow steps finished");
        self.info(format!("Session ID: {}", report.session_id));
        self.info(format!("Total slides generated: {}", report.content.total_slides));
        if report.saved_to.is_some() {
            self.info("The saved slide content can be used for video generation");
        }
    }

    pub fn failure(&self, failure: &WorkflowFailure) {
        self.error(&failure.error);
        if let Some(session_id) = &failure.session_id {
            self.info(format!("Session ID: {}", session_id));
        }
        self.error(format!("Run failed at {} stage", failure.step.failure_stage()));
    }

    pub fn interrupted(&self) {
        self.line("");
        self.warning("Interrupted by user");
    }
}

impl WorkflowObserver for ConsoleObserver {
    fn on_step(&self, step: WorkflowStep) {
        self.header(&format!("STEP {}: {}", step.number(), step.title()));

        if step == WorkflowStep::Submit {
            for file in &self.config.files {
                let name = file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                self.info(format!("Uploading: {}", name));
            }
            self.info("Configuration:");
            for (key, value) in self.config.generation.form_fields() {
                self.line(format!("  - {}: {}", key, value));
            }
        }
    }

    fn on_submitted(&self, session_id: &str, message: Option<&str>) {
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session_id.to_string());
        }

        let short: String = session_id.chars().take(8).collect();
        self.success(format!("Upload successful! Session ID: {}...", short));
        if let Some(message) = message {
            self.info(format!("Message: {}", message));
        }
    }

    fn on_status_changed(&self, snapshot: &StatusSnapshot) {
        self.line("");
        self.line(self.paint(
            format!("Status: {}", snapshot.status.as_str().to_uppercase()),
            Color::Reset,
            true,
        ));
        for stage in StageName::ALL {
            let status = snapshot.stage(stage);
            self.line(format!(
                "  {} {}: {}",
                self.stage_icon(&status),
                stage.as_str().to_uppercase(),
                status
            ));
        }
    }

    fn on_poll_error(&self, error: &ClientError) {
        self.error(format!("Status check failed: {}", error));
    }

    fn on_completed(&self, elapsed: Duration) {
        self.line("");
        self.success(format!(
            "Generation completed in {:.1} seconds!",
            elapsed.as_secs_f64()
        ));
    }

    fn on_results(&self, results: &ResultBundle) {
        self.success(format!("Found {} generated slides", results.slides.len()));

        if let Some(link) = &results.ppt_url {
            self.info(format!("PDF available at: {}", self.client.resolve_link(link)));
        }
        if let Some(link) = &results.poster_url {
            self.info(format!("Poster available at: {}", self.client.resolve_link(link)));
        }

        self.line("");
        self.line(self.paint("Slide Previews:", Color::Reset, true));
        for (index, slide) in results.slides.iter().take(PREVIEW_COUNT).enumerate() {
            self.line(format!(
                "  {}. {}",
                index + 1,
                slide.title.as_deref().unwrap_or("Untitled")
            ));
            self.line(format!(
                "     Image: {}",
                slide.image_url.as_deref().unwrap_or("N/A")
            ));
        }
        if results.slides.len() > PREVIEW_COUNT {
            self.line(format!(
                "  ... and {} more slides",
                results.slides.len() - PREVIEW_COUNT
            ));
        }
    }

    fn on_content(&self, content: &SlideContentBundle) {
        let unit = match content.output_type.parse::<OutputType>() {
            Ok(OutputType::Poster) => "poster",
            Ok(OutputType::Slides) => "slides",
            Err(_) if content.output_type.is_empty() => "unknown",
            Err(_) => content.output_type.as_str(),
        };
        self.success(format!("Retrieved content for {} {}", content.total_slides, unit));

        self.line("");
        self.line(self.paint("Detailed Slide Content:", Color::Reset, true));
        self.line("");

        for slide in &content.slides {
            let title = if slide.title.is_empty() { "Untitled" } else { slide.title.as_str() };
            self.line(self.paint(
                format!("Slide {}: {}", slide.slide_number, title),
                Color::Cyan,
                true,
            ));
            let section = if slide.section_type.is_empty() { "N/A" } else { slide.section_type.as_str() };
            self.line(format!("  Type: {}", section));
            match slide.image_url.as_deref() {
                Some(link) if !link.is_empty() => {
                    self.line(format!("  Image: {}", self.client.resolve_link(link)))
                }
                _ => self.line("  Image: N/A"),
            }
            if !slide.content.is_empty() {
                self.line(format!(
                    "  Content: {}",
                    truncate(&slide.content, CONTENT_PREVIEW_CHARS)
                ));
            }
            self.attachments("Tables", "table", &slide.tables);
            self.attachments("Figures", "figure", &slide.figures);
            self.line("");
        }
    }

    fn on_saved(&self, path: &Path) {
        self.success(format!("Saved full content to: {}", path.display()));
    }
}

impl ConsoleObserver {
    fn attachments(&self, label: &str, noun: &str, items: &[Attachment]) {
        if items.is_empty() {
            return;
        }
        self.line(format!("  {}: {} {}(s)", label, items.len(), noun));
        for item in items {
            self.line(format!(
                "    - {}: {}",
                item.id,
                item.caption.as_deref().unwrap_or("No caption")
            ));
        }
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
