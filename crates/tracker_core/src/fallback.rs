use chrono::{DateTime, Duration, Utc};

use crate::{JobDraft, JobId, JobRecord, JobStatus};

// 2024-01-15T09:00:00Z
const DEFAULT_ANCHOR_SECS: i64 = 1_705_309_200;

/// Substitute collection shown while the remote API cannot be reached.
///
/// The records here are never edited; the sync state receives a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDataset {
    records: Vec<JobRecord>,
}

impl Default for FallbackDataset {
    fn default() -> Self {
        let anchor = DateTime::<Utc>::from_timestamp(DEFAULT_ANCHOR_SECS, 0).unwrap_or_default();
        Self::anchored_at(anchor)
    }
}

impl FallbackDataset {
    /// The two sample applications, dated relative to `anchor`.
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        let records = vec![
            JobDraft::new("Example Corp", "Frontend Developer", anchor)
                .with_link("https://example.com/job")
                .with_notes("This is mock data shown when the API is unavailable.")
                .into_record(JobId::new("mock1")),
            JobDraft::new("Tech Solutions", "React Developer", anchor - Duration::days(7))
                .with_status(JobStatus::Interview)
                .with_link("https://techsolutions.com/careers")
                .with_notes("Second round interview scheduled.")
                .into_record(JobId::new("mock2")),
        ];
        Self { records }
    }

    pub fn from_records(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn to_jobs(&self) -> Vec<JobRecord> {
        self.records.clone()
    }
}
