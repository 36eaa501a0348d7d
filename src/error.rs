//! Error types for the playground job client.

use crate::jobs::JobType;
use thiserror::Error;

/// Job table or client configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The job table has no profile for this job type.
    #[error("job type `{0}` has no entry in the job table")]
    UnconfiguredJobType(JobType),

    #[error("unknown job type: {0}")]
    UnknownJobType(String),

    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,

    /// Network, DNS or body decoding failure.
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upload request rejected with status {status}")]
    Rejected { status: u16 },
}

/// Failures of the job submission request.
///
/// Every variant leaves the file in its job type's idle state.
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("job request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status other than 200.
    #[error("job request rejected with status {status}")]
    Rejected { status: u16 },

    /// The file descriptor carries neither a file id nor a URL.
    #[error("job source has neither a file id nor a url")]
    MissingSource,

    /// A 200 response whose body lacks `jobId`/`userId`.
    #[error("malformed job response: {0}")]
    MalformedResponse(String),
}

impl JobError {
    /// Status code of an application-level rejection, if that is what happened.
    pub fn status(&self) -> Option<u16> {
        match self {
            JobError::Rejected { status } => Some(*status),
            JobError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failures reported by a status poller through its error handler.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status request rejected with status {status}")]
    Rejected { status: u16 },

    /// The server reported the job itself as failed.
    #[error("job {job_id} finished with status {status}")]
    JobFailed { job_id: String, status: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_status_is_exposed() {
        let err = JobError::Rejected { status: 503 };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "job request rejected with status 503");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: JobError = ConfigError::UnknownJobType("summarize".to_string()).into();
        assert_eq!(err.to_string(), "unknown job type: summarize");
        assert_eq!(err.status(), None);
    }
}
