//! playground-jobs: command-line driver for the playground job API.
//!
//! Reads `PLAYGROUND_*` settings from the environment (or a `.env` file) and
//! runs one presign request or one job submission followed by its status poll.

use anyhow::Context;
use clap::{Parser, Subcommand};
use playground_jobs::app::{FileStateStore, PlaygroundState};
use playground_jobs::jobs::{
    FileDescriptor, HttpStatusPoller, JobParamValue, JobParams, JobRequester, JobSubmission,
    JobType, PollHandlers, SourceRef,
};
use playground_jobs::notify::TracingNotifier;
use playground_jobs::upload::{AddFileParams, SelectedFile, UploadRequester};
use playground_jobs::ClientConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "playground-jobs")]
#[command(author, version, about = "Submit and track document processing jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a presigned upload target for a local file
    Presign {
        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Job type the file is destined for
        #[arg(short, long, default_value = "file_extraction")]
        job_type: JobType,
    },

    /// Submit a job and wait for its outcome
    Submit {
        /// Job type (file_extraction, info_extraction, qa_generation)
        #[arg(short, long)]
        job_type: JobType,

        /// Id of a previously uploaded file
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file_id: Option<String>,

        /// Remote resource to process instead of an uploaded file
        #[arg(long)]
        url: Option<String>,

        /// Source type sent to the server (defaults to "file" or "url")
        #[arg(long)]
        source_type: Option<String>,

        /// Job parameter as key=value; "true"/"false" are sent as booleans
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, JobParamValue)>,

        /// Name shown in notifications
        #[arg(long, default_value = "document")]
        name: String,
    },
}

fn parse_param(raw: &str) -> Result<(String, JobParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    let value = match value {
        "true" => JobParamValue::Flag(true),
        "false" => JobParamValue::Flag(false),
        other => JobParamValue::Text(other.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Outcome of a status poll as seen by the CLI.
#[derive(Debug)]
enum Outcome {
    Finished(serde_json::Value),
    Failed(String),
    TimedOut,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "playground_jobs=info,notify=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("loading client configuration")?;
    let client = reqwest::Client::new();
    let store = Arc::new(PlaygroundState::new());
    let notifier = Arc::new(TracingNotifier);

    match cli.command {
        Commands::Presign { file, job_type } => {
            let file = SelectedFile::from_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let uploader = UploadRequester::new(client, config, store, notifier);
            let descriptor = uploader.request_upload(Some(&file), job_type).await?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Submit {
            job_type,
            file_id,
            url,
            source_type,
            params,
            name,
        } => {
            let (source, default_source_type) = match (file_id, url) {
                (Some(id), _) => (SourceRef::FileId(id), "file"),
                (None, Some(url)) => (SourceRef::Url(url), "url"),
                (None, None) => anyhow::bail!("either --file-id or --url is required"),
            };
            let source_type = source_type.unwrap_or_else(|| default_source_type.to_string());

            // The CLI has no upload step, so it registers the slot itself.
            store.add_files(AddFileParams {
                file_id: String::new(),
                job_id: String::new(),
                user_id: String::new(),
                files: SelectedFile::new(name.clone(), Vec::new()),
            });

            let (tx, mut rx) = mpsc::unbounded_channel();
            let (on_error, on_timeout) = (tx.clone(), tx.clone());
            let handlers = PollHandlers::new(
                move |status| {
                    let body = serde_json::to_value(&status).unwrap_or_default();
                    let _ = tx.send(Outcome::Finished(body));
                },
                move |e| {
                    let _ = on_error.send(Outcome::Failed(e.to_string()));
                },
                move || {
                    let _ = on_timeout.send(Outcome::TimedOut);
                },
            );

            let poller = Arc::new(HttpStatusPoller::new(client.clone(), config.poll));
            let requester = JobRequester::new(client, config, store.clone(), notifier, poller);
            let scheduled = requester
                .submit(JobSubmission {
                    job_type,
                    source: FileDescriptor::new(source_type, source),
                    job_params: params.into_iter().collect::<JobParams>(),
                    file_index: 0,
                    filename: name,
                    handlers,
                })
                .await?;

            info!(
                job_id = %scheduled.params().job_id,
                delay_ms = scheduled.delay().as_millis() as u64,
                "Waiting before polling"
            );

            match rx.recv().await {
                Some(Outcome::Finished(body)) => {
                    println!("{}", serde_json::to_string_pretty(&body)?)
                }
                Some(Outcome::Failed(reason)) => anyhow::bail!("job failed: {}", reason),
                Some(Outcome::TimedOut) => anyhow::bail!("job did not finish in time"),
                None => anyhow::bail!("status poll ended without an outcome"),
            }
        }
    }

    Ok(())
}
