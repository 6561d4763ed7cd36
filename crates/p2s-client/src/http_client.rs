use async_trait::async_trait;
use p2s_api_types::{
    GenerationOptions, ResultBundle, SlideContentBundle, StatusSnapshot, SubmitResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::api::{SlidesApi, Submission};
use crate::config::ApiConfig;
use crate::errors::{ClientError, ClientResult};

const MAX_BODY_IN_ERROR: usize = 200;

/// Per-request timeouts, one per endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub submit: Duration,
    pub status: Duration,
    pub fetch: Duration,
    pub cancel: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for RequestTimeouts {
    fn from(config: &ApiConfig) -> Self {
        Self {
            submit: config.submit_timeout(),
            status: config.status_timeout(),
            fetch: config.fetch_timeout(),
            cancel: config.cancel_timeout(),
        }
    }
}

/// HTTP client for a remote generation service
#[derive(Debug, Clone)]
pub struct HttpSlidesClient {
    base_url: Url,
    client: reqwest::Client,
    timeouts: RequestTimeouts,
}

impl HttpSlidesClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("p2s/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            timeouts: RequestTimeouts::default(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        Ok(Self::new(&config.base_url)?.with_timeouts(RequestTimeouts::from(config)))
    }

    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a server-relative link (e.g. `ppt_url`) against the service
    /// URL. Like endpoints, the link lands below any path prefix of the base.
    pub fn resolve_link(&self, link: &str) -> String {
        if Url::parse(link).is_ok() {
            return link.to_string();
        }

        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(link.trim_start_matches('/'))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.to_string())
    }

    /// Build an endpoint URL below the base URL, keeping any path prefix
    /// and percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("Service URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        timeout: Duration,
        what: &str,
    ) -> ClientResult<T> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(what, e))?;

        decode_response(response, what).await
    }
}

#[async_trait]
impl SlidesApi for HttpSlidesClient {
    async fn submit(&self, files: &[PathBuf], options: &GenerationOptions) -> ClientResult<Submission> {
        let mut form = Form::new();
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }

        for path in files {
            let data = tokio::fs::read(path).await.map_err(|e| {
                ClientError::Input(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            log::debug!("Attaching {} ({} bytes)", file_name, data.len());
            form = form.part("files", Part::bytes(data).file_name(file_name));
        }

        let url = self.endpoint(&["api", "chat"])?;
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .timeout(self.timeouts.submit)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("upload", e))?;

        let body: SubmitResponse = decode_response(response, "upload").await?;
        match body.session_id {
            Some(session_id) if !session_id.trim().is_empty() => Ok(Submission {
                session_id,
                message: body.message,
            }),
            _ => Err(ClientError::Protocol("No session_id in response".to_string())),
        }
    }

    async fn status(&self, session_id: &str) -> ClientResult<StatusSnapshot> {
        self.get_json(&["api", "status", session_id], self.timeouts.status, "status")
            .await
    }

    async fn results(&self, session_id: &str) -> ClientResult<ResultBundle> {
        let url = self.endpoint(&["api", "result", session_id])?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeouts.fetch)
            .send()
            .await
            .map_err(|e| transport_error("result", e))?;

        // The service answers 202 while the output is still being written.
        if response.status() == StatusCode::ACCEPTED {
            return Err(ClientError::Network(
                "Result not ready yet (HTTP 202 Accepted)".to_string(),
            ));
        }

        decode_response(response, "result").await
    }

    async fn slide_content(&self, session_id: &str) -> ClientResult<SlideContentBundle> {
        self.get_json(
            &["api", "slides", session_id, "content"],
            self.timeouts.fetch,
            "slide content",
        )
        .await
    }

    async fn cancel(&self, session_id: &str) -> ClientResult<()> {
        let url = self.endpoint(&["api", "cancel", session_id])?;
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .timeout(self.timeouts.cancel)
            .send()
            .await
            .map_err(|e| transport_error("cancel", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Network(describe_failure(status, &body)))
        }
    }
}

fn transport_error(what: &str, err: reqwest::Error) -> ClientError {
    match ClientError::from(err) {
        ClientError::Network(message) => {
            ClientError::Network(format!("{} request failed: {}", what, message))
        }
        other => other,
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response, what: &str) -> ClientResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(what, e))?;

    if !status.is_success() {
        return Err(ClientError::Network(describe_failure(status, &text)));
    }

    serde_json::from_str(&text)
        .map_err(|e| ClientError::Protocol(format!("Invalid {} response: {}", what, e)))
}

/// Summarize a non-success response, preferring the service's `detail` text.
fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(|detail| detail.as_str().map(str::to_string))
        });

    match detail {
        Some(detail) => format!("HTTP {}: {}", status, detail),
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => {
            let mut excerpt: String = body.trim().chars().take(MAX_BODY_IN_ERROR).collect();
            if body.trim().chars().count() > MAX_BODY_IN_ERROR {
                excerpt.push_str("...");
            }
            format!("HTTP {}: {}", status, excerpt)
        }
    }
}
