use crate::{JobDraft, JobId, JobPatch};

/// Remote calls requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchJobs,
    CreateJob(JobDraft),
    UpdateJob { id: JobId, patch: JobPatch },
    DeleteJob { id: JobId },
}
