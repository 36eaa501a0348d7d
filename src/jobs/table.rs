//! Job-type configuration.
//!
//! Each job type owns exactly one state field and moves it between an idle
//! state and a processing state. Supporting a new job type means adding a
//! row here, not a new code path in the requester.

use super::types::{ExtractState, FileState, JobType, StateField, TransformState};
use crate::error::ConfigError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobProfile {
    pub state_field: StateField,
    pub success_state: FileState,
    /// The idle state.
    pub fail_state: FileState,
    pub poll_delay: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct JobTable {
    profiles: HashMap<JobType, JobProfile>,
}

static BUILTIN: Lazy<Arc<JobTable>> = Lazy::new(|| Arc::new(JobTable::builtin()));

/// The process-wide table of built-in job types.
pub fn job_table() -> &'static JobTable {
    &BUILTIN
}

pub fn shared_job_table() -> Arc<JobTable> {
    Arc::clone(&BUILTIN)
}

impl JobTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::empty()
            .with(
                JobType::FileExtraction,
                JobProfile {
                    state_field: StateField::Extract,
                    success_state: ExtractState::Extracting.into(),
                    fail_state: ExtractState::Ready.into(),
                    poll_delay: DEFAULT_POLL_DELAY,
                },
            )
            .with(
                JobType::InfoExtraction,
                JobProfile {
                    state_field: StateField::KeyValue,
                    success_state: TransformState::Transforming.into(),
                    fail_state: TransformState::Ready.into(),
                    poll_delay: DEFAULT_POLL_DELAY,
                },
            )
            .with(
                JobType::QaGeneration,
                JobProfile {
                    state_field: StateField::Qa,
                    success_state: TransformState::Transforming.into(),
                    fail_state: TransformState::Ready.into(),
                    poll_delay: DEFAULT_POLL_DELAY,
                },
            )
    }

    pub fn with(mut self, job_type: JobType, profile: JobProfile) -> Self {
        self.profiles.insert(job_type, profile);
        self
    }

    pub fn profile(&self, job_type: JobType) -> Result<&JobProfile, ConfigError> {
        self.profiles
            .get(&job_type)
            .ok_or(ConfigError::UnconfiguredJobType(job_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_job_type_is_configured() {
        for job_type in JobType::ALL {
            let profile = job_table().profile(job_type).unwrap();
            assert_eq!(profile.poll_delay, Duration::from_secs(5));
            assert_ne!(profile.success_state, profile.fail_state);
        }
    }

    #[test]
    fn test_builtin_state_fields() {
        let table = job_table();
        let field = |t: JobType| table.profile(t).unwrap().state_field;
        assert_eq!(field(JobType::FileExtraction), StateField::Extract);
        assert_eq!(field(JobType::InfoExtraction), StateField::KeyValue);
        assert_eq!(field(JobType::QaGeneration), StateField::Qa);
    }

    #[test]
    fn test_extraction_states_stay_in_extract_family() {
        let profile = job_table().profile(JobType::FileExtraction).unwrap();
        assert_eq!(profile.success_state, FileState::Extract(ExtractState::Extracting));
        assert_eq!(profile.fail_state, FileState::Extract(ExtractState::Ready));
    }

    #[test]
    fn test_shared_table_is_the_builtin_one() {
        let shared = shared_job_table();
        assert!(std::ptr::eq(shared.as_ref(), job_table()));
        assert!(shared.profile(JobType::InfoExtraction).is_ok());
    }

    #[test]
    fn test_missing_entry_is_config_error() {
        let table = JobTable::empty();
        assert_eq!(
            table.profile(JobType::QaGeneration),
            Err(ConfigError::UnconfiguredJobType(JobType::QaGeneration))
        );
    }
}
