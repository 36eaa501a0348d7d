use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid filename"))?
            .to_string();
        let contents = fs::read(path)?;
        Ok(Self { name, contents })
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}

/// Opaque presigned upload target, forwarded verbatim to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresignedResponse(pub serde_json::Value);

/// Identifiers stay empty until the server assigns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFileParams {
    pub file_id: String,
    pub job_id: String,
    pub user_id: String,
    pub files: SelectedFile,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadQuery<'a> {
    pub token: &'a str,
    pub client_id: &'a str,
    pub file_name: &'a str,
    pub job_type: &'a str,
}
