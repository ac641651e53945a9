use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{Effect, JobId, JobPatch, Msg, Severity, TrackerState};

pub const LOAD_FAILED: &str = "Could not fetch your job applications";
pub const CREATE_SUCCEEDED: &str = "Job application added successfully";
pub const CREATE_FAILED: &str = "Could not add your job application";
pub const UPDATE_SUCCEEDED: &str = "Job application updated successfully";
pub const UPDATE_FAILED: &str = "Could not update your job application";
pub const DELETE_SUCCEEDED: &str = "Job application deleted successfully";
pub const DELETE_FAILED: &str = "Could not delete your job application";

/// Pure update function: applies a message to state and returns any effects.
///
/// The collection only changes on a load outcome, on a server-confirmed
/// mutation, or on the local-only update/delete path of degraded mode.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadRequested => {
            state.loading = true;
            state.mark_dirty();
            vec![Effect::FetchJobs]
        }
        Msg::RetryRequested => {
            state.sync.clear_degraded();
            state.loading = true;
            state.mark_dirty();
            vec![Effect::FetchJobs]
        }
        Msg::JobsFetched(jobs) => {
            let dropped = state.sync.replace(jobs);
            if dropped > 0 {
                tracker_warn!("Dropped {} fetched records with duplicate ids", dropped);
            }
            tracker_info!("Loaded {} job applications", state.sync.jobs().len());
            state.loading = false;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FetchFailed { reason } => {
            tracker_warn!("Fetching jobs failed, using fallback data: {}", reason);
            state.sync.fall_back(&state.fallback);
            state.loading = false;
            state.notifications.show(LOAD_FAILED, Severity::Error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::CreateRequested(draft) => vec![Effect::CreateJob(draft)],
        Msg::JobCreated(record) => {
            let id = record.id.clone();
            match state.sync.append(record) {
                Ok(()) => {
                    tracker_info!("Created job {}", id);
                    state.notifications.show(CREATE_SUCCEEDED, Severity::Success);
                }
                Err(_) => {
                    tracker_warn!("Server returned id {} which is already present", id);
                    state.notifications.show(CREATE_FAILED, Severity::Error);
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::CreateFailed { reason } => {
            tracker_warn!("Creating job failed: {}", reason);
            state.notifications.show(CREATE_FAILED, Severity::Error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UpdateRequested { id, patch } => {
            if state.sync.is_degraded() {
                apply_update(&mut state, &id, &patch);
                Vec::new()
            } else {
                vec![Effect::UpdateJob { id, patch }]
            }
        }
        Msg::JobUpdated { id, patch } => {
            if !state.sync.merge(&id, &patch) {
                tracker_debug!("Confirmed update for job {} not held locally", id);
            }
            state.notifications.show(UPDATE_SUCCEEDED, Severity::Success);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UpdateFailed { id, reason } => {
            tracker_warn!("Updating job {} failed: {}", id, reason);
            state.notifications.show(UPDATE_FAILED, Severity::Error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeleteRequested { id } => {
            if state.sync.is_degraded() {
                apply_delete(&mut state, &id);
                Vec::new()
            } else {
                vec![Effect::DeleteJob { id }]
            }
        }
        Msg::JobDeleted { id } => {
            if state.sync.remove(&id).is_none() {
                tracker_debug!("Confirmed delete for job {} not held locally", id);
            }
            state.notifications.show(DELETE_SUCCEEDED, Severity::Success);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeleteFailed { id, reason } => {
            tracker_warn!("Deleting job {} failed: {}", id, reason);
            state.notifications.show(DELETE_FAILED, Severity::Error);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FiltersApplied(predicate) => {
            tracker_debug!("Applying filter {:?}", predicate);
            state.filter.apply(predicate);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FiltersReset => {
            state.filter.reset();
            state.mark_dirty();
            Vec::new()
        }
        Msg::NotificationDismissed => {
            if state.notifications.dismiss().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick(now) => {
            if state.notifications.expire(now) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Local-only edit used while degraded.
fn apply_update(state: &mut TrackerState, id: &JobId, patch: &JobPatch) {
    if state.sync.merge(id, patch) {
        tracker_info!("Updated job {}", id);
        state.notifications.show(UPDATE_SUCCEEDED, Severity::Success);
    } else {
        tracker_warn!("Update for unknown job {}", id);
        state.notifications.show(UPDATE_FAILED, Severity::Error);
    }
    state.mark_dirty();
}

/// Local-only removal used while degraded.
fn apply_delete(state: &mut TrackerState, id: &JobId) {
    if state.sync.remove(id).is_some() {
        tracker_info!("Deleted job {}", id);
        state.notifications.show(DELETE_SUCCEEDED, Severity::Success);
    } else {
        tracker_warn!("Delete for unknown job {}", id);
        state.notifications.show(DELETE_FAILED, Severity::Error);
    }
    state.mark_dirty();
}
