//! InMemoryJobLedger - 開発用・テスト用のジョブ台帳

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{JobId, JobStatus, WorkspaceId, WorkspaceJob};
use crate::ports::{JobLedger, StoreError};

#[derive(Clone, Default)]
pub struct InMemoryJobLedger {
    jobs: Arc<Mutex<HashMap<JobId, WorkspaceJob>>>,
}

impl InMemoryJobLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobLedger for InMemoryJobLedger {
    async fn insert(&self, job: WorkspaceJob) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::Duplicate(job.id.to_string()));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn set_status(
        &self,
        id: &JobId,
        status: JobStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(id) {
            Some(job) => {
                job.finish(status, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: &JobId) -> Result<Option<WorkspaceJob>, StoreError> {
        Ok(self.jobs.lock().await.get(id).cloned())
    }

    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<WorkspaceJob>, StoreError> {
        let jobs = self.jobs.lock().await;
        let mut found: Vec<WorkspaceJob> = jobs
            .values()
            .filter(|job| job.workspace_id == *workspace)
            .cloned()
            .collect();
        // ULID は時刻順にソート可能
        found.sort_by_key(|job| job.id);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkspaceStyle;
    use ulid::Ulid;

    #[tokio::test]
    async fn set_status_reports_missing_jobs() {
        let ledger = InMemoryJobLedger::new();
        let id = JobId::from_ulid(Ulid::new());
        assert!(!ledger.set_status(&id, JobStatus::Success, Utc::now()).await.unwrap());

        let ws = WorkspaceId::parse("w").unwrap();
        ledger
            .insert(WorkspaceJob::pending(id, ws.clone(), WorkspaceStyle::Zettel, Utc::now()))
            .await
            .unwrap();
        assert!(ledger.set_status(&id, JobStatus::Success, Utc::now()).await.unwrap());
        assert_eq!(ledger.get(&id).await.unwrap().unwrap().status, JobStatus::Success);
        assert_eq!(ledger.list_by_workspace(&ws).await.unwrap().len(), 1);
    }
}
