use serde::{Deserialize, Serialize};

use crate::domain::{JobStatus, WorkspaceJob};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounts {
    pub pending: usize,
    pub success: usize,
    pub failed: usize,
}

impl JobCounts {
    pub fn tally<'a>(jobs: impl IntoIterator<Item = &'a WorkspaceJob>) -> Self {
        jobs.into_iter().fold(Self::default(), |mut counts, job| {
            match job.status {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::Success => counts.success += 1,
                JobStatus::Failed => counts.failed += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.pending + self.success + self.failed
    }
}
