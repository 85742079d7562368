//! InMemoryProjectProvider - 共同編集プロバイダのローカル実装
//!
//! 作成・更新の履歴を保持するので、テストから呼び出し内容を検証できます。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::ports::{Project, ProjectError, ProjectProvider, ProjectUpdate};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    pub name: String,
    pub auth_webhook_url: Option<String>,
    pub auth_webhook_methods: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryProjectProvider {
    projects: Arc<Mutex<HashMap<String, ProjectState>>>,
}

impl InMemoryProjectProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn project(&self, id: &str) -> Option<ProjectState> {
        self.projects.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl ProjectProvider for InMemoryProjectProvider {
    async fn create_project(&self, name: &str) -> Result<Project, ProjectError> {
        let id = Ulid::new().to_string();
        self.projects.lock().await.insert(
            id.clone(),
            ProjectState {
                name: name.to_owned(),
                ..ProjectState::default()
            },
        );
        Ok(Project {
            public_key: format!("pk-{id}"),
            secret_key: format!("sk-{id}"),
            id,
        })
    }

    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<(), ProjectError> {
        let mut projects = self.projects.lock().await;
        let project = projects
            .get_mut(id)
            .ok_or_else(|| ProjectError::NotFound(id.to_owned()))?;
        if let Some(name) = &update.name {
            project.name = name.clone();
        }
        if let Some(url) = &update.auth_webhook_url {
            project.auth_webhook_url = Some(url.clone());
        }
        if let Some(methods) = &update.auth_webhook_methods {
            project.auth_webhook_methods = methods.clone();
        }
        Ok(())
    }
}
