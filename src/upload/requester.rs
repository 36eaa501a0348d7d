use crate::app::FileStateStore;
use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::jobs::JobType;
use crate::notify::Notifier;
use crate::upload::types::{AddFileParams, PresignedResponse, SelectedFile, UploadQuery};
use crate::utils::file_size::format_size;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Requests presigned upload targets and registers files with the store.
#[derive(Clone)]
pub struct UploadRequester {
    client: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn FileStateStore>,
    notifier: Arc<dyn Notifier>,
}

impl UploadRequester {
    pub fn new(
        client: reqwest::Client,
        config: ClientConfig,
        store: Arc<dyn FileStateStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            config,
            store,
            notifier,
        }
    }

    /// On success the descriptor and the file are registered with the store.
    /// Failures emit one error notification and are not retried.
    pub async fn request_upload(
        &self,
        file: Option<&SelectedFile>,
        job_type: JobType,
    ) -> Result<PresignedResponse, UploadError> {
        let Some(file) = file else {
            self.notifier.error("No file selected".to_string());
            return Err(UploadError::NoFileSelected);
        };

        debug!(
            file_name = %file.name,
            size = %format_size(file.size()),
            job_type = %job_type,
            "Requesting presigned upload"
        );

        match self.fetch_descriptor(file, job_type).await {
            Ok(descriptor) => {
                self.store.add_files_form_data(descriptor.clone());
                self.store.add_files(AddFileParams {
                    file_id: String::new(),
                    job_id: String::new(),
                    user_id: String::new(),
                    files: file.clone(),
                });
                info!(file_name = %file.name, "Presigned upload registered");
                Ok(descriptor)
            }
            Err(e) => {
                warn!(file_name = %file.name, error = %e, "Presigned upload request failed");
                self.notifier.error(format!(
                    "Error uploading file: {}. Please try again.",
                    file.name
                ));
                Err(e)
            }
        }
    }

    async fn fetch_descriptor(
        &self,
        file: &SelectedFile,
        job_type: JobType,
    ) -> Result<PresignedResponse, UploadError> {
        let query = UploadQuery {
            token: &self.config.token,
            client_id: &self.config.client_id,
            file_name: &file.name,
            job_type: job_type.as_str(),
        };

        let response = self
            .client
            .get(format!("{}/upload", self.config.api_url))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<PresignedResponse>().await?)
    }
}
