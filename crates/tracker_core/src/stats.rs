use crate::{JobRecord, JobStatus};

/// Summary counts over the canonical collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobStats {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl JobStats {
    pub fn from_jobs(jobs: &[JobRecord]) -> Self {
        jobs.iter().fold(
            Self {
                total: jobs.len(),
                ..Self::default()
            },
            |mut stats, job| {
                match job.status {
                    JobStatus::Applied => stats.applied += 1,
                    JobStatus::Interview => stats.interview += 1,
                    JobStatus::Offer => stats.offer += 1,
                    JobStatus::Rejected => stats.rejected += 1,
                }
                stats
            },
        )
    }

    pub fn count(&self, status: JobStatus) -> usize {
        match status {
            JobStatus::Applied => self.applied,
            JobStatus::Interview => self.interview,
            JobStatus::Offer => self.offer,
            JobStatus::Rejected => self.rejected,
        }
    }

    /// Share of `count` in the total, rounded to a whole percent.
    pub fn percentage(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((count as f64 / self.total as f64) * 100.0).round() as u32
    }
}
