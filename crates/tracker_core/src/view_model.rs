use chrono::{DateTime, Utc};

use crate::{FilterPredicate, JobId, JobStats, JobStatus, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerViewModel {
    pub jobs: Vec<JobRowView>,
    pub total_jobs: usize,
    pub stats: JobStats,
    pub predicate: FilterPredicate,
    pub notification: Option<NotificationView>,
    pub degraded: bool,
    pub loading: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: JobId,
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub date_applied: DateTime<Utc>,
    pub date_label: String,
    pub link: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub message: String,
    pub severity: Severity,
}
