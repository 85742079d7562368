//! JobLedger port - restyle ジョブの監査ログ
//!
//! キューではない。作成は同期、終端ステータスの書き込みはバックグラウンドから 1 回だけ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{JobId, JobStatus, WorkspaceId, WorkspaceJob};

use super::StoreError;

#[async_trait]
pub trait JobLedger: Send + Sync {
    async fn insert(&self, job: WorkspaceJob) -> Result<(), StoreError>;

    /// Returns false when no job has this id.
    async fn set_status(
        &self,
        id: &JobId,
        status: JobStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn get(&self, id: &JobId) -> Result<Option<WorkspaceJob>, StoreError>;

    /// Jobs of a workspace, oldest first.
    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<WorkspaceJob>, StoreError>;
}
