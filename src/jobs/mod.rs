//! Job submission, scheduling and status polling.

mod poller;
mod requester;
mod schedule;
mod table;
mod types;

pub use poller::{
    ErrorHandler, HttpStatusPoller, JobStatusResponse, PollHandlers, PollRequest, PollerConfig,
    StatusPoller, SuccessHandler, TimeoutHandler,
};
pub use requester::{JobRequester, JobSubmission};
pub use schedule::{schedule_poll, PollExit, ScheduledPoll};
pub use table::{job_table, shared_job_table, JobProfile, JobTable};
pub use types::{
    ExtractState, FileDescriptor, FileState, GetParams, JobParamValue, JobParams, JobType,
    RequestParams, SourceRef, StateField, SubmissionResponse, TransformState,
};
