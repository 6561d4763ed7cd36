//! Bounded status polling
//!
//! The service runs a generation job asynchronously, so the client checks
//! the status endpoint at an interval until the job reaches a terminal state
//! or the wait budget is spent. Transient failures of a status check
//! (transport errors, undecodable bodies) are retried; a `failed` job status
//! and any other error are not.

use p2s_api_types::{JobStatus, StatusSnapshot};
use std::time::Duration;
use tokio::time::Instant;

use crate::api::SlidesApi;
use crate::config::PollingConfig;
use crate::errors::{ClientError, ClientResult};
use crate::observer::WorkflowObserver;

/// How often and for how long to poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
    pub max_attempts: Option<u32>,
    pub backoff_factor: f64,
    pub max_interval: Duration,
}

impl PollPolicy {
    /// Fixed-interval policy.
    pub fn fixed(interval: Duration, max_wait: Duration) -> Self {
        Self {
            interval,
            max_wait,
            max_attempts: None,
            backoff_factor: 1.0,
            max_interval: interval,
        }
    }

    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor.max(1.0);
        self.max_interval = max_interval.max(self.interval);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Interval to use after `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 {
            return current;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }
}

/// Seconds to a `Duration`, saturating where the value does not fit.
fn saturating_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 { Duration::MAX } else { Duration::ZERO })
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        let interval = saturating_secs(config.interval_secs);
        let mut policy = Self::fixed(interval, Duration::from_secs(config.max_wait_secs))
            .with_backoff(config.backoff_factor, saturating_secs(config.max_interval_secs));
        policy.max_attempts = config.max_attempts;
        policy
    }
}

/// Terminal state reached by [`poll_until_terminal`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// The `completed` snapshot.
    pub snapshot: StatusSnapshot,
    pub elapsed: Duration,
    pub attempts: u32,
}

/// Poll a session until it completes, fails, or the policy is exhausted.
///
/// Returns `Ok` only for `completed`. A `failed` status becomes
/// [`ClientError::RemoteFailure`] with the service's error text, and running
/// out of time or attempts becomes [`ClientError::Timeout`]. The sleep before
/// the last check is clamped to the remaining budget, so the call returns no
/// later than `max_wait + interval` plus the duration of one status request.
pub async fn poll_until_terminal<A>(
    api: &A,
    session_id: &str,
    policy: &PollPolicy,
    observer: &dyn WorkflowObserver,
) -> ClientResult<PollOutcome>
where
    A: SlidesApi + ?Sized,
{
    let started = Instant::now();
    let mut last_snapshot: Option<StatusSnapshot> = None;
    let mut interval = policy.interval;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        match api.status(session_id).await {
            Ok(snapshot) => {
                if last_snapshot.as_ref() != Some(&snapshot) {
                    log::debug!("Session {} status changed: {}", session_id, snapshot.status);
                    observer.on_status_changed(&snapshot);
                    last_snapshot = Some(snapshot.clone());
                }

                match snapshot.status {
                    JobStatus::Completed => {
                        let elapsed = started.elapsed();
                        log::info!(
                            "Session {} completed after {:.1}s ({} status checks)",
                            session_id,
                            elapsed.as_secs_f64(),
                            attempts
                        );
                        return Ok(PollOutcome {
                            snapshot,
                            elapsed,
                            attempts,
                        });
                    }
                    JobStatus::Failed => {
                        let message = snapshot.failure_message();
                        log::error!("Session {} failed: {}", session_id, message);
                        return Err(ClientError::RemoteFailure(message));
                    }
                    _ => {}
                }
            }
            Err(e) if e.is_transient() => {
                log::warn!("Status check for session {} failed: {}", session_id, e);
                observer.on_poll_error(&e);
            }
            Err(e) => {
                log::error!("Status check for session {} cannot be retried: {}", session_id, e);
                return Err(e);
            }
        }

        let elapsed = started.elapsed();
        let attempts_exhausted = policy.max_attempts.map_or(false, |max| attempts >= max);
        if elapsed >= policy.max_wait || attempts_exhausted {
            log::error!(
                "Gave up waiting for session {} after {:.1}s",
                session_id,
                elapsed.as_secs_f64()
            );
            return Err(ClientError::Timeout { elapsed, attempts });
        }

        let remaining = policy.max_wait - elapsed;
        tokio::time::sleep(interval.min(remaining)).await;
        interval = policy.next_interval(interval);
    }
}
