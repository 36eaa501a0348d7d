use super::poller::{PollHandlers, PollRequest, StatusPoller};
use super::schedule::{schedule_poll, ScheduledPoll};
use super::table::{shared_job_table, JobTable};
use super::types::{
    FileDescriptor, GetParams, JobParams, JobType, RequestParams, SubmissionResponse,
};
use crate::app::FileStateStore;
use crate::config::ClientConfig;
use crate::error::JobError;
use crate::notify::Notifier;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Everything needed to submit one job for one file slot.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub job_type: JobType,
    pub source: FileDescriptor,
    pub job_params: JobParams,
    /// Slot of the file in the state store.
    pub file_index: usize,
    pub filename: String,
    pub handlers: PollHandlers,
}

/// Submits processing jobs and moves the file's state field accordingly.
#[derive(Clone)]
pub struct JobRequester {
    client: reqwest::Client,
    config: ClientConfig,
    table: Arc<JobTable>,
    store: Arc<dyn FileStateStore>,
    notifier: Arc<dyn Notifier>,
    poller: Arc<dyn StatusPoller>,
}

impl JobRequester {
    pub fn new(
        client: reqwest::Client,
        config: ClientConfig,
        store: Arc<dyn FileStateStore>,
        notifier: Arc<dyn Notifier>,
        poller: Arc<dyn StatusPoller>,
    ) -> Self {
        Self {
            client,
            config,
            table: shared_job_table(),
            store,
            notifier,
            poller,
        }
    }

    pub fn with_table(mut self, table: Arc<JobTable>) -> Self {
        self.table = table;
        self
    }

    /// Submits the job with a single `POST /request`.
    ///
    /// Only a 200 response with ids moves the file to its processing state and
    /// schedules the poll. Every other outcome, an empty source included, moves
    /// it back to idle. Both emit exactly one notification. An unconfigured job
    /// type fails before anything is sent or written.
    pub async fn submit(&self, submission: JobSubmission) -> Result<ScheduledPoll, JobError> {
        let JobSubmission {
            job_type,
            source,
            job_params,
            file_index,
            filename,
            handlers,
        } = submission;

        let profile = *self.table.profile(job_type).map_err(|e| {
            error!(job_type = %job_type, error = %e, "Job type is not configured");
            e
        })?;

        if !source.has_source() {
            warn!(job_type = %job_type, file_name = %filename, "Job source is empty");
            self.notifier
                .error(format!("Error uploading {}. Please try again.", filename));
            self.store
                .update_file_at_index(file_index, profile.state_field, profile.fail_state);
            return Err(JobError::MissingSource);
        }

        let params = RequestParams {
            token: self.config.token.clone(),
            client_id: self.config.client_id.clone(),
            files: vec![source],
            job_type,
            job_params,
        };
        debug!(
            job_type = %job_type,
            file_index,
            file_name = %filename,
            "Submitting job"
        );

        match self.send(&params).await {
            Ok(accepted) => {
                self.notifier.success(format!("{} submitted!", filename));
                self.store
                    .update_file_at_index(file_index, profile.state_field, profile.success_state);
                info!(
                    job_id = %accepted.job_id,
                    job_type = %job_type,
                    file_name = %filename,
                    "Job accepted"
                );

                let request = PollRequest {
                    api_url: self.config.api_url.clone(),
                    get_params: GetParams {
                        user_id: accepted.user_id,
                        job_id: accepted.job_id,
                        job_type,
                    },
                    handlers,
                };
                Ok(schedule_poll(
                    Arc::clone(&self.poller),
                    request,
                    profile.poll_delay,
                ))
            }
            Err(e) => {
                warn!(
                    job_type = %job_type,
                    file_name = %filename,
                    error = %e,
                    "Job submission failed"
                );
                self.notifier
                    .error(format!("Error uploading {}. Please try again.", filename));
                self.store
                    .update_file_at_index(file_index, profile.state_field, profile.fail_state);
                Err(e)
            }
        }
    }

    async fn send(&self, params: &RequestParams) -> Result<SubmissionResponse, JobError> {
        let response = self
            .client
            .post(format!("{}/request", self.config.api_url))
            .header(CONTENT_TYPE, "application/json")
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(JobError::Rejected {
                status: status.as_u16(),
            });
        }

        response
            .json::<SubmissionResponse>()
            .await
            .map_err(|e| JobError::MalformedResponse(e.to_string()))
    }
}
