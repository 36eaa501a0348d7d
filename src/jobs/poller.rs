//! Job status polling.
//!
//! The requester only depends on [`StatusPoller`]. [`HttpStatusPoller`] is the
//! default implementation: a fixed-interval loop over `GET /request` bounded
//! by an attempt budget.

use super::types::GetParams;
use crate::error::PollError;
use async_trait::async_trait;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SuccessHandler = Arc<dyn Fn(JobStatusResponse) + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(PollError) + Send + Sync>;
pub type TimeoutHandler = Arc<dyn Fn() + Send + Sync>;

/// Terminal-outcome callbacks. A poller calls exactly one of them, once.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct PollHandlers {
    #[derivative(Debug = "ignore")]
    pub on_success: SuccessHandler,
    #[derivative(Debug = "ignore")]
    pub on_error: ErrorHandler,
    #[derivative(Debug = "ignore")]
    pub on_timeout: TimeoutHandler,
}

impl PollHandlers {
    pub fn new(
        on_success: impl Fn(JobStatusResponse) + Send + Sync + 'static,
        on_error: impl Fn(PollError) + Send + Sync + 'static,
        on_timeout: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_success: Arc::new(on_success),
            on_error: Arc::new(on_error),
            on_timeout: Arc::new(on_timeout),
        }
    }

    /// Handlers that ignore every outcome.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {}, || {})
    }
}

#[derive(Debug, Clone)]
pub struct PollRequest {
    pub api_url: String,
    pub get_params: GetParams,
    pub handlers: PollHandlers,
}

#[async_trait]
pub trait StatusPoller: Send + Sync {
    /// Checks the job until it reaches a terminal outcome, then invokes the
    /// matching handler.
    async fn poll(&self, request: PollRequest);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(rename = "jobStatus")]
    pub job_status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Succeeded,
    Failed,
    Pending,
}

impl JobStatusResponse {
    fn progress(&self) -> Progress {
        let status = self.job_status.as_str();
        if ["SUCCEEDED", "COMPLETED"]
            .iter()
            .any(|s| s.eq_ignore_ascii_case(status))
        {
            Progress::Succeeded
        } else if ["FAILED", "ERROR"].iter().any(|s| s.eq_ignore_ascii_case(status)) {
            Progress::Failed
        } else {
            Progress::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpStatusPoller {
    client: reqwest::Client,
    config: PollerConfig,
}

impl HttpStatusPoller {
    /// A budget of zero attempts is raised to one so every poll checks at least once.
    pub fn new(client: reqwest::Client, config: PollerConfig) -> Self {
        let config = PollerConfig {
            max_attempts: config.max_attempts.max(1),
            ..config
        };
        Self { client, config }
    }

    async fn check(
        &self,
        api_url: &str,
        params: &GetParams,
    ) -> Result<JobStatusResponse, PollError> {
        let response = self
            .client
            .get(format!("{}/request", api_url))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(response.json::<JobStatusResponse>().await?)
    }
}

#[async_trait]
impl StatusPoller for HttpStatusPoller {
    async fn poll(&self, request: PollRequest) {
        let PollRequest {
            api_url,
            get_params,
            handlers,
        } = request;

        for attempt in 1..=self.config.max_attempts {
            match self.check(&api_url, &get_params).await {
                Ok(status) => match status.progress() {
                    Progress::Succeeded => {
                        info!(job_id = %get_params.job_id, attempt, "Job finished");
                        (handlers.on_success)(status);
                        return;
                    }
                    Progress::Failed => {
                        warn!(job_id = %get_params.job_id, status = %status.job_status, "Job failed");
                        (handlers.on_error)(PollError::JobFailed {
                            job_id: get_params.job_id.clone(),
                            status: status.job_status,
                        });
                        return;
                    }
                    Progress::Pending => {
                        debug!(job_id = %get_params.job_id, attempt, status = %status.job_status, "Job pending");
                    }
                },
                Err(e) => {
                    warn!(job_id = %get_params.job_id, error = %e, "Status check failed");
                    (handlers.on_error)(e);
                    return;
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        warn!(
            job_id = %get_params.job_id,
            attempts = self.config.max_attempts,
            "Job did not finish in time"
        );
        (handlers.on_timeout)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: &str) -> JobStatusResponse {
        serde_json::from_value(json!({ "jobStatus": status, "progress": 40 })).unwrap()
    }

    #[test]
    fn test_terminal_statuses() {
        assert_eq!(response("SUCCEEDED").progress(), Progress::Succeeded);
        assert_eq!(response("completed").progress(), Progress::Succeeded);
        assert_eq!(response("FAILED").progress(), Progress::Failed);
        assert_eq!(response("RUNNING").progress(), Progress::Pending);
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let status = response("RUNNING");
        assert_eq!(status.extra.get("progress"), Some(&json!(40)));
    }

    #[test]
    fn test_handlers_debug_hides_closures() {
        let rendered = format!("{:?}", PollHandlers::noop());
        assert!(rendered.starts_with("PollHandlers"));
    }
}
