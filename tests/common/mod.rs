//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use playground_jobs::app::{FileStateStore, PlaygroundState};
use playground_jobs::jobs::{JobRequester, PollRequest, StatusPoller};
use playground_jobs::notify::RecordingNotifier;
use playground_jobs::upload::{AddFileParams, SelectedFile, UploadRequester};
use playground_jobs::ClientConfig;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Poller that reports each invocation instead of polling.
pub struct ChannelPoller(pub mpsc::UnboundedSender<PollRequest>);

#[async_trait]
impl StatusPoller for ChannelPoller {
    async fn poll(&self, request: PollRequest) {
        let _ = self.0.send(request);
    }
}

pub struct Harness {
    pub store: Arc<PlaygroundState>,
    pub notifier: Arc<RecordingNotifier>,
    pub polls: mpsc::UnboundedReceiver<PollRequest>,
    pub jobs: JobRequester,
    pub uploads: UploadRequester,
}

impl Harness {
    /// Wires both requesters against `api_url` with `files` already registered.
    pub fn new(api_url: &str, files: &[&str]) -> Self {
        let store = Arc::new(PlaygroundState::new());
        for name in files {
            store.add_files(AddFileParams {
                file_id: String::new(),
                job_id: String::new(),
                user_id: String::new(),
                files: SelectedFile::new(*name, b"%PDF-1.7".to_vec()),
            });
        }
        let notifier = Arc::new(RecordingNotifier::new());
        let (tx, polls) = mpsc::unbounded_channel();
        let config = ClientConfig::new(api_url, "tok-123", "client-9");
        let client = reqwest::Client::new();

        let jobs = JobRequester::new(
            client.clone(),
            config.clone(),
            store.clone(),
            notifier.clone(),
            Arc::new(ChannelPoller(tx)),
        );
        let uploads = UploadRequester::new(client, config, store.clone(), notifier.clone());

        Self {
            store,
            notifier,
            polls,
            jobs,
            uploads,
        }
    }
}
