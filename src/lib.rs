//! Client for the document playground's job API.
//!
//! A file goes through three independent requests: a presigned upload
//! request ([`upload::UploadRequester`]), a job submission
//! ([`jobs::JobRequester`]) and, after a fixed delay, status polling
//! ([`jobs::StatusPoller`]). Per-file UI state lives behind
//! [`app::FileStateStore`] and user-facing messages go through
//! [`notify::Notifier`].

pub mod app;
pub mod config;
pub mod error;
pub mod jobs;
pub mod notify;
pub mod upload;
pub mod utils;

pub use config::ClientConfig;
pub use error::{ConfigError, JobError, PollError, UploadError};
