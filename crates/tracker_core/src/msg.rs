use std::time::Instant;

use crate::{FilterPredicate, JobDraft, JobId, JobPatch, JobRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Initial fetch of the collection.
    LoadRequested,
    /// User asked to reconnect after a failed load.
    RetryRequested,
    /// Server returned the full collection.
    JobsFetched(Vec<JobRecord>),
    /// Listing failed; switch to the fallback dataset.
    FetchFailed { reason: String },
    /// A validated draft is ready to be submitted.
    CreateRequested(JobDraft),
    /// Server accepted a draft and assigned it an id.
    JobCreated(JobRecord),
    CreateFailed { reason: String },
    UpdateRequested { id: JobId, patch: JobPatch },
    /// Server confirmed the update.
    JobUpdated { id: JobId, patch: JobPatch },
    UpdateFailed { id: JobId, reason: String },
    DeleteRequested { id: JobId },
    /// Server confirmed the deletion.
    JobDeleted { id: JobId },
    DeleteFailed { id: JobId, reason: String },
    FiltersApplied(FilterPredicate),
    FiltersReset,
    NotificationDismissed,
    /// Clock tick used to expire notifications.
    Tick(Instant),
    NoOp,
}
