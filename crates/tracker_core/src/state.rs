use std::time::Duration;

use crate::view_model::{JobRowView, NotificationView, TrackerViewModel};
use crate::{
    FallbackDataset, FilterPredicate, FilterState, JobRecord, JobStats, Notification,
    NotificationChannel, SyncState,
};

/// Everything one tracker session owns. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    pub(crate) sync: SyncState,
    pub(crate) filter: FilterState,
    pub(crate) notifications: NotificationChannel,
    pub(crate) fallback: FallbackDataset,
    pub(crate) loading: bool,
    dirty: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, fallback: FallbackDataset) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notifications = NotificationChannel::with_duration(duration);
        self
    }

    pub fn sync(&self) -> &SyncState {
        &self.sync
    }

    pub fn jobs(&self) -> &[JobRecord] {
        self.sync.jobs()
    }

    pub fn is_degraded(&self) -> bool {
        self.sync.is_degraded()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn predicate(&self) -> &FilterPredicate {
        self.filter.predicate()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.active()
    }

    pub fn fallback(&self) -> &FallbackDataset {
        &self.fallback
    }

    /// The canonical collection narrowed by the last-applied predicate.
    pub fn filtered_jobs(&self) -> Vec<JobRecord> {
        self.filter.view(self.sync.jobs())
    }

    pub fn stats(&self) -> JobStats {
        JobStats::from_jobs(self.sync.jobs())
    }

    pub fn view(&self) -> TrackerViewModel {
        TrackerViewModel {
            jobs: self.filtered_jobs().into_iter().map(row_view).collect(),
            total_jobs: self.sync.jobs().len(),
            stats: self.stats(),
            predicate: self.filter.predicate().clone(),
            notification: self.notifications.active().map(|n| NotificationView {
                message: n.message.clone(),
                severity: n.severity,
            }),
            degraded: self.sync.is_degraded(),
            loading: self.loading,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, then clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn row_view(job: JobRecord) -> JobRowView {
    JobRowView {
        date_label: job.date_applied.format("%b %-d, %Y").to_string(),
        id: job.id,
        company: job.company,
        role: job.role,
        status: job.status,
        date_applied: job.date_applied,
        link: job.link,
        notes: job.notes,
    }
}
