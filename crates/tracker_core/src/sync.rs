use std::collections::HashSet;

use crate::{FallbackDataset, JobId, JobPatch, JobRecord};

/// The canonical collection and whether it currently holds fallback data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncState {
    jobs: Vec<JobRecord>,
    degraded: bool,
}

impl SyncState {
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn get(&self, id: &JobId) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| &job.id == id)
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.get(id).is_some()
    }

    /// Installs a server collection. Later duplicates of an id are dropped;
    /// the number dropped is returned.
    pub(crate) fn replace(&mut self, jobs: Vec<JobRecord>) -> usize {
        let received = jobs.len();
        let mut seen = HashSet::with_capacity(received);
        self.jobs = jobs
            .into_iter()
            .filter(|job| seen.insert(job.id.clone()))
            .collect();
        self.degraded = false;
        received - self.jobs.len()
    }

    pub(crate) fn fall_back(&mut self, dataset: &FallbackDataset) {
        self.jobs = dataset.to_jobs();
        self.degraded = true;
    }

    pub(crate) fn clear_degraded(&mut self) {
        self.degraded = false;
    }

    /// Appends a created record. A record whose id is already present is
    /// handed back untouched.
    pub(crate) fn append(&mut self, record: JobRecord) -> Result<(), JobRecord> {
        if self.contains(&record.id) {
            return Err(record);
        }
        self.jobs.push(record);
        Ok(())
    }

    pub(crate) fn merge(&mut self, id: &JobId, patch: &JobPatch) -> bool {
        match self.jobs.iter_mut().find(|job| &job.id == id) {
            Some(job) => {
                patch.apply_to(job);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &JobId) -> Option<JobRecord> {
        let index = self.jobs.iter().position(|job| &job.id == id)?;
        Some(self.jobs.remove(index))
    }
}
