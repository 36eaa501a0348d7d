mod requester;
mod types;

pub use requester::UploadRequester;
pub use types::{AddFileParams, PresignedResponse, SelectedFile};
