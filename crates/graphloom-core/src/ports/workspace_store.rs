//! WorkspaceStore port - ワークスペースレコード
//!
//! 更新・削除は常に (workspace id, user id) の所有者フィルタ付き。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{UserId, Workspace, WorkspaceId, WorkspacePatch};

use super::StoreError;

/// Result of an owner-filtered update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: bool,
    pub modified: bool,
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn insert(&self, workspace: Workspace) -> Result<(), StoreError>;

    async fn find(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<Option<Workspace>, StoreError>;

    async fn update(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
        patch: &WorkspacePatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Returns false when nothing matched.
    async fn delete(&self, workspace: &WorkspaceId, user: &UserId) -> Result<bool, StoreError>;

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Workspace>, StoreError>;
}
