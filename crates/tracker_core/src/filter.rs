use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::{JobRecord, JobStatus};

/// Inclusive interval on `dateApplied`. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        let after_start = self.start.is_none_or(|start| *instant >= start);
        let before_end = self.end.is_none_or(|end| *instant <= end);
        after_start && before_end
    }
}

/// Status set plus date range. An empty status set places no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPredicate {
    pub statuses: BTreeSet<JobStatus>,
    pub date_range: DateRange,
}

impl FilterPredicate {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn new(statuses: impl IntoIterator<Item = JobStatus>, date_range: DateRange) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            date_range,
        }
    }

    /// Date-only predicate with no status restriction.
    pub fn by_date(date_range: DateRange) -> Self {
        Self {
            statuses: BTreeSet::new(),
            date_range,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.statuses.is_empty() && self.date_range.is_unbounded()
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&job.status);
        status_ok && self.date_range.contains(&job.date_applied)
    }
}

/// Derives the visible subset of `jobs`, preserving their relative order.
pub fn apply_filter(jobs: &[JobRecord], predicate: &FilterPredicate) -> Vec<JobRecord> {
    jobs.iter()
        .filter(|job| predicate.matches(job))
        .cloned()
        .collect()
}

/// Remembers the last predicate applied so the view can be re-derived after
/// the canonical collection changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    predicate: FilterPredicate,
}

impl FilterState {
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn apply(&mut self, predicate: FilterPredicate) {
        self.predicate = predicate;
    }

    pub fn reset(&mut self) {
        self.predicate = FilterPredicate::unrestricted();
    }

    pub fn view(&self, jobs: &[JobRecord]) -> Vec<JobRecord> {
        apply_filter(jobs, &self.predicate)
    }
}
