use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracker_core::{
    update, Effect, FilterPredicate, JobDraft, JobId, JobPatch, JobRecord, Msg, Notification,
    TrackerState, TrackerViewModel,
};
use tracker_logging::{tracker_debug, tracker_info};

use crate::{ErrorKind, Gateway, MutationOutcome};

/// Owns one session's tracker state and runs its effects against a [`Gateway`].
///
/// The state lock is only held while a message is applied, never across a
/// remote call, so reads stay available while a request is pending.
pub struct SyncEngine {
    gateway: Arc<dyn Gateway>,
    state: Mutex<TrackerState>,
}

impl SyncEngine {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_state(gateway, TrackerState::new())
    }

    pub fn with_state(gateway: Arc<dyn Gateway>, state: TrackerState) -> Self {
        Self {
            gateway,
            state: Mutex::new(state),
        }
    }

    /// Fetches the collection. Failure switches to the fallback dataset and
    /// raises an error notification; nothing is returned to the caller.
    pub async fn load(&self) {
        let effects = self.dispatch(Msg::LoadRequested);
        self.run_effects(effects).await;
    }

    /// Leaves degraded mode and fetches again.
    pub async fn retry_connection(&self) {
        tracker_info!("Retrying connection to the job API");
        let effects = self.dispatch(Msg::RetryRequested);
        self.run_effects(effects).await;
    }

    pub async fn create(&self, draft: JobDraft) -> MutationOutcome {
        if let Err(errors) = draft.validate() {
            tracker_debug!("Rejected draft before submission: {}", errors);
            return MutationOutcome::failure(ErrorKind::Validation(errors));
        }
        let effects = self.dispatch(Msg::CreateRequested(draft));
        self.run_effects(effects).await
    }

    pub async fn update(&self, id: &JobId, patch: JobPatch) -> MutationOutcome {
        if let Err(errors) = patch.validate() {
            tracker_debug!("Rejected edit of job {}: {}", id, errors);
            return MutationOutcome::failure(ErrorKind::Validation(errors));
        }
        let (effects, known) = self.dispatch_observing(
            Msg::UpdateRequested {
                id: id.clone(),
                patch,
            },
            |state| state.sync().contains(id),
        );
        self.finish_mutation(id, effects, known).await
    }

    pub async fn delete(&self, id: &JobId) -> MutationOutcome {
        let (effects, known) = self
            .dispatch_observing(Msg::DeleteRequested { id: id.clone() }, |state| {
                state.sync().contains(id)
            });
        self.finish_mutation(id, effects, known).await
    }

    pub fn apply_filter(&self, predicate: FilterPredicate) {
        self.dispatch(Msg::FiltersApplied(predicate));
    }

    pub fn reset_filter(&self) {
        self.dispatch(Msg::FiltersReset);
    }

    pub fn dismiss_notification(&self) {
        self.dispatch(Msg::NotificationDismissed);
    }

    /// Expires the active notification if its window has passed.
    pub fn tick(&self, now: Instant) {
        self.dispatch(Msg::Tick(now));
    }

    pub fn view(&self) -> TrackerViewModel {
        self.lock().view()
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.lock().jobs().to_vec()
    }

    pub fn filtered_jobs(&self) -> Vec<JobRecord> {
        self.lock().filtered_jobs()
    }

    pub fn is_degraded(&self) -> bool {
        self.lock().is_degraded()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.lock().notification().cloned()
    }

    pub fn consume_dirty(&self) -> bool {
        self.lock().consume_dirty()
    }

    /// Completes an update or delete: degraded mode resolved it locally
    /// (no effects), otherwise the remote call decides.
    async fn finish_mutation(
        &self,
        id: &JobId,
        effects: Vec<Effect>,
        known: bool,
    ) -> MutationOutcome {
        if !effects.is_empty() {
            return self.run_effects(effects).await;
        }
        if known {
            MutationOutcome::success()
        } else {
            MutationOutcome::failure(ErrorKind::NotFound(id.clone()))
        }
    }

    async fn run_effects(&self, effects: Vec<Effect>) -> MutationOutcome {
        let mut outcome = MutationOutcome::success();
        for effect in effects {
            outcome = self.run_effect(effect).await;
        }
        outcome
    }

    async fn run_effect(&self, effect: Effect) -> MutationOutcome {
        match effect {
            Effect::FetchJobs => match self.gateway.list().await {
                Ok(jobs) => {
                    self.dispatch(Msg::JobsFetched(jobs));
                    MutationOutcome::success()
                }
                Err(err) => {
                    let kind = err.kind;
                    self.dispatch(Msg::FetchFailed {
                        reason: err.to_string(),
                    });
                    MutationOutcome::failure(ErrorKind::Transport(kind))
                }
            },
            Effect::CreateJob(draft) => match self.gateway.create(&draft).await {
                Ok(record) => {
                    let id = record.id.clone();
                    let (_, duplicate) = self
                        .dispatch_observing(Msg::JobCreated(record), |state| {
                            state.sync().contains(&id)
                        });
                    if duplicate {
                        MutationOutcome::failure(ErrorKind::DuplicateId(id))
                    } else {
                        MutationOutcome::success()
                    }
                }
                Err(err) => {
                    let kind = err.kind;
                    self.dispatch(Msg::CreateFailed {
                        reason: err.to_string(),
                    });
                    MutationOutcome::failure(ErrorKind::Transport(kind))
                }
            },
            Effect::UpdateJob { id, patch } => match self.gateway.update(&id, &patch).await {
                Ok(echo) => {
                    if echo.is_some() {
                        tracker_debug!("Server echoed job {} after update", id);
                    }
                    self.dispatch(Msg::JobUpdated { id, patch });
                    MutationOutcome::success()
                }
                Err(err) => {
                    let kind = err.kind;
                    self.dispatch(Msg::UpdateFailed {
                        id,
                        reason: err.to_string(),
                    });
                    MutationOutcome::failure(ErrorKind::Transport(kind))
                }
            },
            Effect::DeleteJob { id } => match self.gateway.delete(&id).await {
                Ok(()) => {
                    self.dispatch(Msg::JobDeleted { id });
                    MutationOutcome::success()
                }
                Err(err) => {
                    let kind = err.kind;
                    self.dispatch(Msg::DeleteFailed {
                        id,
                        reason: err.to_string(),
                    });
                    MutationOutcome::failure(ErrorKind::Transport(kind))
                }
            },
        }
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        self.dispatch_observing(msg, |_| ()).0
    }

    /// Applies `msg`, also returning what `observe` saw just before it.
    fn dispatch_observing<R>(
        &self,
        msg: Msg,
        observe: impl FnOnce(&TrackerState) -> R,
    ) -> (Vec<Effect>, R) {
        let mut guard = self.lock();
        let observed = observe(&*guard);
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        (effects, observed)
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
