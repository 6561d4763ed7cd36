use p2s_api_types::{
    JobStatus, ResultBundle, SlideContentBundle, SlideRecord, SlideSummary, StageName,
    StatusSnapshot,
};
use serde::{Deserialize, Serialize};

/// How the mock answers `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmitReply {
    /// Accept the upload. Without a fixed id a fresh UUID is issued.
    Accept {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    /// Accept the upload but send `"session_id": null`.
    NullSession,
    /// Reject with a status code and a `detail` message.
    Reject { status: u16, detail: String },
}

/// One scripted answer of `GET /api/status/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusReply {
    Snapshot { snapshot: StatusSnapshot },
    Error { status: u16, detail: String },
    /// Sent verbatim with status 200.
    Raw { body: String },
}

impl From<StatusSnapshot> for StatusReply {
    fn from(snapshot: StatusSnapshot) -> Self {
        StatusReply::Snapshot { snapshot }
    }
}

/// How the mock answers `GET /api/result/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultReply {
    Ready { bundle: ResultBundle },
    /// 202 Accepted, output still being written.
    NotReady,
    Error { status: u16, detail: String },
}

/// How the mock answers `GET /api/slides/{id}/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentReply {
    Ready { bundle: SlideContentBundle },
    Error { status: u16, detail: String },
    Raw { body: String },
}

/// Scripted behaviour for one mock service instance.
///
/// Status replies are consumed in order; the last one repeats for every
/// later request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFixture {
    pub submit: SubmitReply,
    pub statuses: Vec<StatusReply>,
    pub result: ResultReply,
    pub content: ContentReply,
}

impl ServiceFixture {
    /// A twelve-slide run that walks through every pipeline stage.
    pub fn completed_run() -> Self {
        Self::with_slide_count(12)
    }

    pub fn with_slide_count(count: usize) -> Self {
        let mut statuses = vec![StatusReply::from(StatusSnapshot::new(JobStatus::Pending))];
        for (index, current) in StageName::ALL.iter().enumerate() {
            let mut snapshot = StatusSnapshot::new(JobStatus::Running);
            for done in &StageName::ALL[..index] {
                snapshot = snapshot.with_stage(*done, JobStatus::Completed);
            }
            statuses.push(snapshot.with_stage(*current, JobStatus::Running).into());
        }
        let finished = StageName::ALL.iter().fold(
            StatusSnapshot::new(JobStatus::Completed),
            |snapshot, stage| snapshot.with_stage(*stage, JobStatus::Completed),
        );
        statuses.push(finished.into());

        Self {
            submit: SubmitReply::Accept {
                session_id: None,
                message: Some("Generation started".to_string()),
            },
            statuses,
            result: ResultReply::Ready {
                bundle: result_bundle(count),
            },
            content: ContentReply::Ready {
                bundle: content_bundle(count),
            },
        }
    }

    /// A run whose job fails after the first stage.
    pub fn failed_run(error: &str) -> Self {
        Self {
            statuses: vec![
                StatusSnapshot::new(JobStatus::Running)
                    .with_stage(StageName::Rag, JobStatus::Running)
                    .into(),
                StatusSnapshot::new(JobStatus::Failed)
                    .with_stage(StageName::Rag, JobStatus::Failed)
                    .with_error(error)
                    .into(),
            ],
            ..Self::completed_run()
        }
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_session_id(mut self, session_id: &str) -> Self {
        self.submit = SubmitReply::Accept {
            session_id: Some(session_id.to_string()),
            message: Some("Generation started".to_string()),
        };
        self
    }

    pub fn with_submit(mut self, submit: SubmitReply) -> Self {
        self.submit = submit;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<StatusReply>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_result(mut self, result: ResultReply) -> Self {
        self.result = result;
        self
    }

    pub fn with_content(mut self, content: ContentReply) -> Self {
        self.content = content;
        self
    }
}

impl Default for ServiceFixture {
    fn default() -> Self {
        Self::completed_run()
    }
}

pub fn result_bundle(count: usize) -> ResultBundle {
    ResultBundle {
        slides: (1..=count)
            .map(|number| SlideSummary {
                title: Some(format!("Slide {}", number)),
                image_url: Some(format!("/outputs/mock/slide_{}.png", number)),
            })
            .collect(),
        ppt_url: Some("/outputs/mock/slides.pdf".to_string()),
        poster_url: None,
        message: None,
    }
}

pub fn content_bundle(count: usize) -> SlideContentBundle {
    let sections = ["title", "introduction", "method", "results", "conclusion"];
    let slides = (1..=count as u32)
        .map(|number| SlideRecord {
            slide_number: number,
            title: format!("Phần {}", number),
            section_type: sections[(number as usize - 1) % sections.len()].to_string(),
            content: format!("Nội dung của trang {}: thì hiện tại đơn", number),
            image_url: Some(format!("/outputs/mock/slide_{}.png", number)),
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
