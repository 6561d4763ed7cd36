//! Mock Paper2Slides service for client tests
//!
//! Serves the same endpoints as the real generation backend from a scripted
//! [`ServiceFixture`], and records what clients send so tests can assert on
//! uploads, request counts and cancellations without running the pipeline.

pub mod fixtures;
pub mod handlers;
pub mod server;

pub use fixtures::{ContentReply, ResultReply, ServiceFixture, StatusReply, SubmitReply};
pub use handlers::{RecordedSubmission, RequestCounts, UploadedFile};
pub use server::MockService;
