//! Client for the Paper2Slides generation service
//!
//! The service turns uploaded documents into slide decks or posters. Generation
//! is slow and runs server-side, so a client session is a fixed sequence: upload
//! the documents, poll the session until it finishes, then download the result
//! bundle and the structured per-slide content. [`WorkflowDriver`] runs that
//! sequence over any [`SlidesApi`]; [`HttpSlidesClient`] is the implementation
//! that talks to a real server.
//!
//! ```no_run
//! use p2s_client::{ClientConfig, HttpSlidesClient, NoopObserver, WorkflowDriver};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let api = Arc::new(HttpSlidesClient::from_config(&config.api)?);
//! let driver = WorkflowDriver::from_config(api, &config);
//! let report = driver
//!     .run(&["paper.pdf".into()], &NoopObserver)
//!     .await?;
//! println!("{} slides", report.content.total_slides);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http_client;
pub mod observer;
pub mod persist;
pub mod polling;
pub mod workflow;

#[cfg(test)]
mod test_utils;

pub use api::{SlidesApi, Submission};
pub use config::{load_config, ApiConfig, ClientConfig, ConfigLoader, OutputConfig, PollingConfig};
pub use errors::{ClientError, ClientResult};
pub use http_client::{HttpSlidesClient, RequestTimeouts};
pub use observer::{NoopObserver, WorkflowObserver, WorkflowStep};
pub use persist::{content_file_name, load_content, save_content};
pub use polling::{poll_until_terminal, PollOutcome, PollPolicy};
pub use workflow::{validate_inputs, WorkflowDriver, WorkflowFailure, WorkflowReport};
