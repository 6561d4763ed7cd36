//! Configuration type definitions for the client
//!
//! A configuration is built once at process start and handed to the
//! workflow driver. Every section is optional in the YAML file; omitted
//! values fall back to the defaults used against a locally running service.

use p2s_api_types::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ClientError, ClientResult};

/// Longest pause between two status checks, in seconds.
pub const MAX_POLL_INTERVAL_SECS: f64 = 86_400.0;
/// Largest growth factor accepted for the poll interval.
pub const MAX_BACKOFF_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub generation: GenerationOptions,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Documents to upload.
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

/// Where the service lives and how long each request may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_cancel_timeout")]
    pub cancel_timeout_secs: u64,
}

/// Status polling behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: f64,
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Multiplier applied to the interval after each check; 1.0 keeps it fixed.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_max_interval")]
    pub max_interval_secs: f64,
}

/// What to do with the structured slide content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_save_content")]
    pub save_content: bool,
}

fn default_base_url() -> String { "http://localhost:8152".to_string() }
fn default_submit_timeout() -> u64 { 600 }
fn default_status_timeout() -> u64 { 10 }
fn default_fetch_timeout() -> u64 { 30 }
fn default_cancel_timeout() -> u64 { 5 }
fn default_poll_interval() -> f64 { 5.0 }
fn default_max_wait() -> u64 { 1800 }
fn default_backoff_factor() -> f64 { 1.0 }
fn default_max_interval() -> f64 { 60.0 }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_save_content() -> bool { true }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            submit_timeout_secs: default_submit_timeout(),
            status_timeout_secs: default_status_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
            cancel_timeout_secs: default_cancel_timeout(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            max_wait_secs: default_max_wait(),
            max_attempts: None,
            backoff_factor: default_backoff_factor(),
            max_interval_secs: default_max_interval(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_content: default_save_content(),
        }
    }
}

impl ApiConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cancel_timeout(&self) -> Duration {
        Duration::from_secs(self.cancel_timeout_secs)
    }
}

impl ClientConfig {
    pub fn validate(&self) -> ClientResult<()> {
        let base_url = url::Url::parse(&self.api.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "Service URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        for (name, secs) in [
            ("submit_timeout_secs", self.api.submit_timeout_secs),
            ("status_timeout_secs", self.api.status_timeout_secs),
            ("fetch_timeout_secs", self.api.fetch_timeout_secs),
            ("cancel_timeout_secs", self.api.cancel_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ClientError::Config(format!("api.{} must be greater than 0", name)));
            }
        }

        let polling = &self.polling;
        if !polling.interval_secs.is_finite() || polling.interval_secs <= 0.0 {
            return Err(ClientError::Config(
                "polling.interval_secs must be greater than 0".to_string(),
            ));
        }
        if polling.interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ClientError::Config(format!(
                "polling.interval_secs must not exceed {}",
                MAX_POLL_INTERVAL_SECS
            )));
        }
        if polling.max_wait_secs == 0 {
            return Err(ClientError::Config(
                "polling.max_wait_secs must be greater than 0".to_string(),
            ));
        }
        if polling.max_attempts == Some(0) {
            return Err(ClientError::Config(
                "polling.max_attempts must be greater than 0 when set".to_string(),
            ));
        }
        if !polling.backoff_factor.is_finite()
            || polling.backoff_factor < 1.0
            || polling.backoff_factor > MAX_BACKOFF_FACTOR
        {
            return Err(ClientError::Config(format!(
                "polling.backoff_factor must be between 1.0 and {}",
                MAX_BACKOFF_FACTOR
            )));
        }
        if !polling.max_interval_secs.is_finite() || polling.max_interval_secs < polling.interval_secs {
            return Err(ClientError::Config(
                "polling.max_interval_secs must not be smaller than polling.interval_secs".to_string(),
            ));
        }
        if polling.max_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ClientError::Config(format!(
                "polling.max_interval_secs must not exceed {}",
                MAX_POLL_INTERVAL_SECS
            )));
        }

        if self.generation.style.trim().is_empty() {
            return Err(ClientError::Config("generation.style cannot be empty".to_string()));
        }
        if self.generation.language.trim().is_empty() {
            return Err(ClientError::Config("generation.language cannot be empty".to_string()));
        }

        Ok(())
    }
}
