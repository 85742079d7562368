//! ProjectProvider port - 共同編集ドキュメントのプロジェクト管理
//!
//! ワークスペース作成時のプロジェクト作成と、改名時のプロジェクト名変更にのみ使う。

use async_trait::async_trait;

/// Credentials of a freshly created project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub public_key: String,
    pub secret_key: String,
}

/// Fields a project update may change; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub auth_webhook_url: Option<String>,
    pub auth_webhook_methods: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("project {0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait ProjectProvider: Send + Sync {
    async fn create_project(&self, name: &str) -> Result<Project, ProjectError>;

    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<(), ProjectError>;
}
