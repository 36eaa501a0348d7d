mod state;

use crate::jobs::{FileState, StateField};
use crate::upload::{AddFileParams, PresignedResponse};
pub use state::{FileRecord, PlaygroundState, StateChange};

/// Registry of per-file state, addressed by index.
///
/// Implementations must tolerate concurrent calls for different indices;
/// the requesters never lock around them.
pub trait FileStateStore: Send + Sync {
    fn update_file_at_index(&self, index: usize, field: StateField, value: FileState);

    fn add_files_form_data(&self, data: PresignedResponse);

    fn add_files(&self, params: AddFileParams);
}
