use super::FileStateStore;
use crate::jobs::{ExtractState, FileState, StateField, TransformState};
use crate::upload::{AddFileParams, PresignedResponse, SelectedFile};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file: SelectedFile,
    pub file_id: String,
    pub job_id: String,
    pub user_id: String,
    pub extract_state: ExtractState,
    pub key_value_state: TransformState,
    pub qa_state: TransformState,
}

impl FileRecord {
    pub fn state(&self, field: StateField) -> FileState {
        match field {
            StateField::Extract => self.extract_state.into(),
            StateField::KeyValue => self.key_value_state.into(),
            StateField::Qa => self.qa_state.into(),
        }
    }

    /// Writes `value` into `field`, refusing values from the wrong family.
    fn set_state(&mut self, field: StateField, value: FileState) -> bool {
        match (field, value) {
            (StateField::Extract, FileState::Extract(state)) => self.extract_state = state,
            (StateField::KeyValue, FileState::Transform(state)) => self.key_value_state = state,
            (StateField::Qa, FileState::Transform(state)) => self.qa_state = state,
            _ => return false,
        }
        true
    }
}

impl From<AddFileParams> for FileRecord {
    fn from(params: AddFileParams) -> Self {
        Self {
            file: params.files,
            file_id: params.file_id,
            job_id: params.job_id,
            user_id: params.user_id,
            extract_state: ExtractState::default(),
            key_value_state: TransformState::default(),
            qa_state: TransformState::default(),
        }
    }
}

/// One applied `update_file_at_index` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub index: usize,
    pub field: StateField,
    pub value: FileState,
}

#[derive(Debug, Default)]
struct Inner {
    files: Vec<FileRecord>,
    form_data: Vec<PresignedResponse>,
    history: Vec<StateChange>,
}

/// In-memory file state store.
///
/// Updates are serialized behind a mutex, so flows for different files may
/// call into it concurrently.
#[derive(Debug, Default)]
pub struct PlaygroundState {
    inner: Mutex<Inner>,
}

impl PlaygroundState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every write is a single assignment; a poisoned lock holds consistent data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn files(&self) -> Vec<FileRecord> {
        self.lock().files.clone()
    }

    pub fn file(&self, index: usize) -> Option<FileRecord> {
        self.lock().files.get(index).cloned()
    }

    pub fn form_data(&self) -> Vec<PresignedResponse> {
        self.lock().form_data.clone()
    }

    pub fn history(&self) -> Vec<StateChange> {
        self.lock().history.clone()
    }

    pub fn clear(&self) {
        *self.lock() = Inner::default();
    }
}

impl FileStateStore for PlaygroundState {
    fn update_file_at_index(&self, index: usize, field: StateField, value: FileState) {
        let mut inner = self.lock();
        let applied = match inner.files.get_mut(index) {
            Some(record) => record.set_state(field, value),
            None => {
                tracing::warn!(file_index = index, "no file at index, state update dropped");
                return;
            }
        };
        if !applied {
            tracing::warn!(
                file_index = index,
                field = %field,
                ?value,
                "state value does not belong to field, update dropped"
            );
            return;
        }
        inner.history.push(StateChange {
            index,
            field,
            value,
        });
    }

    fn add_files_form_data(&self, data: PresignedResponse) {
        self.lock().form_data.push(data);
    }

    fn add_files(&self, params: AddFileParams) {
        self.lock().files.push(params.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: &PlaygroundState, name: &str) {
        state.add_files(AddFileParams {
            file_id: String::new(),
            job_id: String::new(),
            user_id: String::new(),
            files: SelectedFile::new(name, b"%PDF".to_vec()),
        });
    }

    #[test]
    fn test_new_files_start_ready() {
        let state = PlaygroundState::new();
        add(&state, "report.pdf");

        let record = state.file(0).unwrap();
        assert_eq!(record.file.name, "report.pdf");
        assert_eq!(record.extract_state, ExtractState::Ready);
        assert_eq!(record.state(StateField::Qa), FileState::from(TransformState::Ready));
    }

    #[test]
    fn test_update_by_index() {
        let state = PlaygroundState::new();
        add(&state, "a.pdf");
        add(&state, "b.pdf");

        state.update_file_at_index(1, StateField::KeyValue, TransformState::Transforming.into());

        assert_eq!(state.file(0).unwrap().key_value_state, TransformState::Ready);
        assert_eq!(state.file(1).unwrap().key_value_state, TransformState::Transforming);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_mismatched_family_is_dropped() {
        let state = PlaygroundState::new();
        add(&state, "a.pdf");

        state.update_file_at_index(0, StateField::Extract, TransformState::Transforming.into());
        state.update_file_at_index(7, StateField::Extract, ExtractState::Extracting.into());

        assert_eq!(state.file(0).unwrap().extract_state, ExtractState::Ready);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_clear() {
        let state = PlaygroundState::new();
        add(&state, "a.pdf");
        state.add_files_form_data(PresignedResponse(serde_json::json!({ "url": "u" })));
        state.clear();
        assert!(state.files().is_empty());
        assert!(state.form_data().is_empty());
    }
}
