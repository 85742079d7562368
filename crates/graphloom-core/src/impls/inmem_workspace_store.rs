//! InMemoryWorkspaceStore - 開発用・テスト用のワークスペースストア

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{UserId, Workspace, WorkspaceId, WorkspacePatch};
use crate::ports::{StoreError, UpdateOutcome, WorkspaceStore};

#[derive(Clone, Default)]
pub struct InMemoryWorkspaceStore {
    workspaces: Arc<Mutex<HashMap<WorkspaceId, Workspace>>>,
}

impl InMemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup without the owner filter.
    pub async fn get(&self, workspace: &WorkspaceId) -> Option<Workspace> {
        self.workspaces.lock().await.get(workspace).cloned()
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn insert(&self, workspace: Workspace) -> Result<(), StoreError> {
        let mut workspaces = self.workspaces.lock().await;
        if workspaces.contains_key(&workspace.id) {
            return Err(StoreError::Duplicate(workspace.id.to_string()));
        }
        workspaces.insert(workspace.id.clone(), workspace);
        Ok(())
    }

    async fn find(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
    ) -> Result<Option<Workspace>, StoreError> {
        let workspaces = self.workspaces.lock().await;
        Ok(workspaces
            .get(workspace)
            .filter(|ws| ws.user_id == *user)
            .cloned())
    }

    async fn update(
        &self,
        workspace: &WorkspaceId,
        user: &UserId,
        patch: &WorkspacePatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut workspaces = self.workspaces.lock().await;
        match workspaces.get_mut(workspace).filter(|ws| ws.user_id == *user) {
            Some(ws) => Ok(UpdateOutcome {
                matched: true,
                modified: ws.apply(patch, now),
            }),
            None => Ok(UpdateOutcome::default()),
        }
    }

    async fn delete(&self, workspace: &WorkspaceId, user: &UserId) -> Result<bool, StoreError> {
        let mut workspaces = self.workspaces.lock().await;
        let owned = workspaces
            .get(workspace)
            .is_some_and(|ws| ws.user_id == *user);
        if owned {
            workspaces.remove(workspace);
        }
        Ok(owned)
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Workspace>, StoreError> {
        let workspaces = self.workspaces.lock().await;
        let mut owned: Vec<Workspace> = workspaces
            .values()
            .filter(|ws| ws.user_id == *user)
            .cloned()
            .collect();
        owned.sort_by_key(|ws| ws.created_at);
        Ok(owned)
    }
}
