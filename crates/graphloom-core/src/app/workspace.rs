//! WorkspaceService - ワークスペースの作成・参照・更新・削除
//!
//! ワークスペース 1 つに共同編集プロジェクトが 1 つ紐づく。
//! プロジェクト側の付随操作（webhook 設定・改名）の失敗はログに残すだけで、
//! ワークスペース操作そのものは成功として返す。

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    GraphError, GraphResult, ProjectBinding, UnknownStyle, UserId, Workspace, WorkspaceId,
    WorkspacePatch, WorkspaceStyle, project_name,
};
use crate::ports::{
    Clock, ConnectionFilter, ConnectionStore, IdGenerator, ProjectProvider, ProjectUpdate,
    WorkspaceStore,
};

use super::engine::parse_workspace;

/// Auth webhook に流す共同編集プロバイダのメソッド
pub const AUTH_WEBHOOK_METHODS: [&str; 3] = ["AttachDocument", "PushPull", "WatchDocuments"];

pub const UPDATED: &str = "workspace updated successfully";
pub const UNCHANGED: &str = "no changes applied";

#[derive(Clone)]
pub struct WorkspaceService {
    workspaces: Arc<dyn WorkspaceStore>,
    connections: Arc<dyn ConnectionStore>,
    projects: Arc<dyn ProjectProvider>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    auth_webhook_url: Option<String>,
}

fn parse_style(raw: &str) -> GraphResult<WorkspaceStyle> {
    raw.parse()
        .map_err(|e: UnknownStyle| GraphError::InvalidArgument(e.to_string()))
}

fn parse_user(raw: &str) -> GraphResult<UserId> {
    UserId::parse(raw).map_err(GraphError::invalid_id("user"))
}

impl WorkspaceService {
    pub fn new(
        workspaces: Arc<dyn WorkspaceStore>,
        connections: Arc<dyn ConnectionStore>,
        projects: Arc<dyn ProjectProvider>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            workspaces,
            connections,
            projects,
            ids,
            clock,
            auth_webhook_url: None,
        }
    }

    pub fn with_auth_webhook(mut self, url: Option<String>) -> Self {
        self.auth_webhook_url = url;
        self
    }

    pub async fn create_workspace(
        &self,
        title: &str,
        style: &str,
        user_id: &str,
    ) -> GraphResult<WorkspaceId> {
        if title.trim().is_empty() || style.trim().is_empty() || user_id.trim().is_empty() {
            return Err(GraphError::InvalidArgument(
                "title, type and userID are required".into(),
            ));
        }
        let style = parse_style(style)?;
        let user = parse_user(user_id)?;

        let project = self
            .projects
            .create_project(&project_name(&user, title))
            .await
            .map_err(GraphError::provider("failed to create project"))?;

        let now = self.clock.now();
        let workspace = Workspace {
            id: self.ids.generate_workspace_id(),
            title: title.to_owned(),
            style,
            user_id: user,
            project: Some(ProjectBinding {
                project_id: project.id.clone(),
                public_key: project.public_key,
                secret_key: project.secret_key,
            }),
            created_at: now,
            updated_at: now,
        };
        let id = workspace.id.clone();
        self.workspaces
            .insert(workspace)
            .await
            .map_err(GraphError::store("failed to create workspace"))?;

        if let Some(url) = &self.auth_webhook_url {
            let update = ProjectUpdate {
                auth_webhook_url: Some(url.clone()),
                auth_webhook_methods: Some(AUTH_WEBHOOK_METHODS.map(str::to_owned).to_vec()),
                ..ProjectUpdate::default()
            };
            if let Err(err) = self.projects.update_project(&project.id, &update).await {
                warn!(workspace_id = %id, project_id = %project.id, error = %err, "failed to set auth webhook");
            }
        }

        info!(workspace_id = %id, style = %style, "workspace created");
        Ok(id)
    }

    /// 所有者のワークスペースならそのスタイル、無ければ None
    pub async fn check_workspace(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> GraphResult<Option<WorkspaceStyle>> {
        let workspace = parse_workspace(workspace_id)?;
        let user = parse_user(user_id)?;
        let found = self
            .workspaces
            .find(&workspace, &user)
            .await
            .map_err(GraphError::store("failed to fetch workspace"))?;
        Ok(found.map(|ws| ws.style))
    }

    pub async fn update_workspace(
        &self,
        workspace_id: &str,
        user_id: &str,
        title: Option<&str>,
        style: Option<&str>,
    ) -> GraphResult<&'static str> {
        let workspace = parse_workspace(workspace_id)?;
        let user = parse_user(user_id)?;
        let style = style.map(parse_style).transpose()?;

        let current = self
            .workspaces
            .find(&workspace, &user)
            .await
            .map_err(GraphError::store("failed to fetch workspace"))?
            .ok_or(GraphError::WorkspaceNotFound)?;

        let title = title.filter(|t| *t != current.title);
        if let (Some(title), Some(project)) = (title, &current.project) {
            let update = ProjectUpdate {
                name: Some(project_name(&current.user_id, title)),
                ..ProjectUpdate::default()
            };
            if let Err(err) = self.projects.update_project(&project.project_id, &update).await {
                warn!(project_id = %project.project_id, error = %err, "failed to rename project");
            }
        }

        let patch = WorkspacePatch {
            title: title.map(str::to_owned),
            style,
        };
        let outcome = self
            .workspaces
            .update(&workspace, &user, &patch, self.clock.now())
            .await
            .map_err(GraphError::store("failed to update workspace"))?;
        if !outcome.matched {
            return Err(GraphError::WorkspaceNotFound);
        }
        Ok(if outcome.modified { UPDATED } else { UNCHANGED })
    }

    /// ワークスペースと、そのワークスペースの全コネクションを消す
    pub async fn delete_workspace(&self, workspace_id: &str, user_id: &str) -> GraphResult<()> {
        let workspace = parse_workspace(workspace_id)?;
        let user = parse_user(user_id)?;

        // 他人のワークスペースのコネクションは消さない
        self.workspaces
            .find(&workspace, &user)
            .await
            .map_err(GraphError::store("failed to fetch workspace"))?
            .ok_or(GraphError::WorkspaceNotFound)?;

        let removed = self
            .connections
            .bulk_delete(&workspace, &ConnectionFilter::All)
            .await
            .map_err(GraphError::store("failed to delete connections"))?;
        let deleted = self
            .workspaces
            .delete(&workspace, &user)
            .await
            .map_err(GraphError::store("failed to delete workspace"))?;
        if !deleted {
            return Err(GraphError::WorkspaceNotFound);
        }
        info!(workspace_id = %workspace, connections = removed, "workspace deleted");
        Ok(())
    }

    pub async fn list_workspaces(&self, user_id: &str) -> GraphResult<Vec<Workspace>> {
        if user_id.trim().is_empty() {
            return Err(GraphError::InvalidArgument("userID is blank".into()));
        }
        let user = parse_user(user_id)?;
        self.workspaces
            .list_by_user(&user)
            .await
            .map_err(GraphError::store("failed to find workspaces"))
    }
}
