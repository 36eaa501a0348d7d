use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Server-side processing pipeline a file is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FileExtraction,
    InfoExtraction,
    QaGeneration,
}

impl JobType {
    pub const ALL: [JobType; 3] = [
        JobType::FileExtraction,
        JobType::InfoExtraction,
        JobType::QaGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FileExtraction => "file_extraction",
            JobType::InfoExtraction => "info_extraction",
            JobType::QaGeneration => "qa_generation",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|job_type| job_type.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownJobType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateField {
    #[serde(rename = "extractState")]
    Extract,
    #[serde(rename = "keyValueState")]
    KeyValue,
    #[serde(rename = "qaState")]
    Qa,
}

impl StateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Extract => "extractState",
            StateField::KeyValue => "keyValueState",
            StateField::Qa => "qaState",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractState {
    #[default]
    Ready,
    Extracting,
    Extracted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformState {
    #[default]
    Ready,
    Transforming,
    Transformed,
}

/// Value written into a [`StateField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileState {
    Extract(ExtractState),
    Transform(TransformState),
}

impl From<ExtractState> for FileState {
    fn from(state: ExtractState) -> Self {
        FileState::Extract(state)
    }
}

impl From<TransformState> for FileState {
    fn from(state: TransformState) -> Self {
        FileState::Transform(state)
    }
}

/// Where the server should read the file from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A file previously uploaded through a presigned target.
    FileId(String),
    Url(String),
}

/// One entry of the `files` array of a job request.
///
/// Built from a [`SourceRef`], so at most one of `fileId`/`url` is present.
/// An empty identifier leaves both unset, which the job requester refuses to
/// send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub source_type: String,
    #[serde(rename = "fileId", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileDescriptor {
    pub fn new(source_type: impl Into<String>, source: SourceRef) -> Self {
        let non_empty = |value: String| (!value.is_empty()).then_some(value);
        let (file_id, url) = match source {
            SourceRef::FileId(id) => (non_empty(id), None),
            SourceRef::Url(url) => (None, non_empty(url)),
        };
        Self {
            source_type: source_type.into(),
            file_id,
            url,
        }
    }

    pub fn has_source(&self) -> bool {
        self.file_id.is_some() || self.url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JobParamValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for JobParamValue {
    fn from(value: &str) -> Self {
        JobParamValue::Text(value.to_string())
    }
}

impl From<String> for JobParamValue {
    fn from(value: String) -> Self {
        JobParamValue::Text(value)
    }
}

impl From<bool> for JobParamValue {
    fn from(value: bool) -> Self {
        JobParamValue::Flag(value)
    }
}

pub type JobParams = BTreeMap<String, JobParamValue>;

#[derive(Debug, Clone, Serialize)]
pub struct RequestParams {
    pub token: String,
    pub client_id: String,
    pub files: Vec<FileDescriptor>,
    pub job_type: JobType,
    #[serde(rename = "jobParams", skip_serializing_if = "JobParams::is_empty")]
    pub job_params: JobParams,
}

/// Fields of a 200 submission response the client relies on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub job_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetParams {
    pub user_id: String,
    pub job_id: String,
    pub job_type: JobType,
}
