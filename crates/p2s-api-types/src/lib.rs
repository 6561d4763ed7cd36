//! Type definitions for the Paper2Slides generation service API
//!
//! This crate holds the request and response contract of the remote
//! document-to-slides service: the options sent with an upload, the status
//! snapshots returned while a session runs, and the two result
//! representations fetched once it completes. It is shared by the client
//! library and by the mock service used in tests, so both sides decode the
//! same JSON the same way.
//!
//! ## Example
//!
//! ```rust
//! use p2s_api_types::{JobStatus, StageName, StatusSnapshot};
//!
//! let snapshot: StatusSnapshot = serde_json::from_str(
//!     r#"{"status": "running", "stages": {"rag": "completed", "summary": "running"}}"#,
//! ).unwrap();
//!
//! assert_eq!(snapshot.status, JobStatus::Running);
//! assert_eq!(snapshot.stage(StageName::Plan), JobStatus::Pending);
//! ```

pub mod error;
pub mod options;
pub mod results;
pub mod status;

pub use error::*;
pub use options::*;
pub use results::*;
pub use status::*;
