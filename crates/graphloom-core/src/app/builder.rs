//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # ポイント
//! - ports を `Arc<dyn _>` で受け取り、各コンポーネントに配る
//! - 起動時検証（Fail-fast 設計）: 必須の port が欠けていれば build() が失敗する
//! - Clock / IdGenerator は省略時に SystemClock / UlidGenerator を使う

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    Connection, GraphResult, JobId, Workspace, WorkspaceGraph, WorkspaceId, WorkspaceJob,
    WorkspaceStyle,
};
use crate::impls::{
    InMemoryConnectionStore, InMemoryJobLedger, InMemoryProjectProvider, InMemoryWorkspaceStore,
};
use crate::observability::JobCounts;
use crate::ports::{
    Clock, ConnectionStore, IdGenerator, JobLedger, ProjectProvider, SimilarityClient,
    SystemClock, UlidGenerator, WorkspaceStore,
};

use super::config::AppConfig;
use super::engine::GraphEngine;
use super::projector::GraphProjector;
use super::restyle::{RestyleOrchestrator, RestyleReceipt};
use super::workspace::WorkspaceService;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new(AppConfig::from_env()?)
///     .with_in_memory_stores()
///     .similarity(Arc::new(HttpSimilarityClient::new(&config.collaborators)?))
///     .build()?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    config: AppConfig,
    connections: Option<Arc<dyn ConnectionStore>>,
    similarity: Option<Arc<dyn SimilarityClient>>,
    workspaces: Option<Arc<dyn WorkspaceStore>>,
    jobs: Option<Arc<dyn JobLedger>>,
    projects: Option<Arc<dyn ProjectProvider>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These ports must be provided before build().")]
    MissingPorts(Vec<&'static str>),
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn connections(mut self, store: Arc<dyn ConnectionStore>) -> Self {
        self.connections = Some(store);
        self
    }

    pub fn similarity(mut self, client: Arc<dyn SimilarityClient>) -> Self {
        self.similarity = Some(client);
        self
    }

    pub fn workspaces(mut self, store: Arc<dyn WorkspaceStore>) -> Self {
        self.workspaces = Some(store);
        self
    }

    pub fn jobs(mut self, ledger: Arc<dyn JobLedger>) -> Self {
        self.jobs = Some(ledger);
        self
    }

    pub fn projects(mut self, provider: Arc<dyn ProjectProvider>) -> Self {
        self.projects = Some(provider);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// 類似度サービス以外のストアをすべてインメモリ実装で埋める
    pub fn with_in_memory_stores(self) -> Self {
        self.connections(Arc::new(InMemoryConnectionStore::new()))
            .workspaces(Arc::new(InMemoryWorkspaceStore::new()))
            .jobs(Arc::new(InMemoryJobLedger::new()))
            .projects(Arc::new(InMemoryProjectProvider::new()))
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - 必須の port（connections, similarity, workspaces, jobs, projects）が全て揃っているか
    /// - 不足があれば BuildError::MissingPorts を返す
    pub fn build(self) -> Result<App, BuildError> {
        let (Some(connections), Some(similarity), Some(workspaces), Some(jobs), Some(projects)) = (
            self.connections.clone(),
            self.similarity.clone(),
            self.workspaces.clone(),
            self.jobs.clone(),
            self.projects.clone(),
        ) else {
            let missing = [
                ("connections", self.connections.is_none()),
                ("similarity", self.similarity.is_none()),
                ("workspaces", self.workspaces.is_none()),
                ("jobs", self.jobs.is_none()),
                ("projects", self.projects.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(BuildError::MissingPorts(missing));
        };

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(clock.clone())),
        };

        let engine = GraphEngine::new(connections.clone(), similarity, clock.clone())
            .with_top_n(self.config.similar_top_n);
        let restyle = RestyleOrchestrator::new(
            engine.clone(),
            workspaces.clone(),
            jobs,
            ids.clone(),
            clock.clone(),
        );
        let projector = GraphProjector::new(connections.clone());
        let workspace_service = WorkspaceService::new(workspaces, connections, projects, ids, clock)
            .with_auth_webhook(self.config.auth_webhook_url.clone());

        Ok(App {
            config: self.config,
            engine,
            restyle,
            projector,
            workspaces: workspace_service,
        })
    }
}

/// App は公開操作の窓口
///
/// 各メソッドは生の文字列 ID を受け取り、検証はコンポーネント側で行う。
#[derive(Clone)]
pub struct App {
    config: AppConfig,
    engine: GraphEngine,
    restyle: RestyleOrchestrator,
    projector: GraphProjector,
    workspaces: WorkspaceService,
}

impl App {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    // ---- connections ----

    pub async fn confirm_connection(&self, source: &str, target: &str, workspace: &str) -> GraphResult<()> {
        self.engine.confirm(source, target, workspace).await
    }

    pub async fn edit_connection(
        &self,
        source: &str,
        target: &str,
        workspace: &str,
    ) -> GraphResult<Connection> {
        self.engine.edit(source, target, workspace).await
    }

    pub async fn confirm_all_connections(&self, workspace: &str) -> GraphResult<u64> {
        self.engine.confirm_all(workspace).await
    }

    pub async fn clear_pending_connections(&self, workspace: &str) -> GraphResult<u64> {
        self.engine.clear_pending(workspace).await
    }

    pub async fn auto_connect_workspace(&self, workspace: &str) -> GraphResult<Vec<Connection>> {
        self.engine.auto_connect_workspace(workspace).await
    }

    pub async fn on_document_created(
        &self,
        document: &str,
        workspace: &str,
    ) -> GraphResult<Vec<Connection>> {
        self.engine.on_document_created(document, workspace).await
    }

    pub async fn on_document_deleted(&self, document: &str, workspace: &str) -> GraphResult<u64> {
        self.engine.on_document_deleted(document, workspace).await
    }

    pub async fn get_workspace_graph(&self, workspace: &str) -> GraphResult<WorkspaceGraph> {
        self.projector.project_workspace_graph(workspace).await
    }

    // ---- restyle / jobs ----

    pub async fn change_workspace_style(
        &self,
        workspace: &str,
        user: &str,
        style: &str,
    ) -> GraphResult<RestyleReceipt> {
        self.restyle.change_workspace_style(workspace, user, style).await
    }

    pub async fn job(&self, job_id: &str) -> GraphResult<Option<WorkspaceJob>> {
        self.restyle.job(job_id).await
    }

    pub async fn jobs_for_workspace(&self, workspace: &str) -> GraphResult<Vec<WorkspaceJob>> {
        self.restyle.jobs_for_workspace(workspace).await
    }

    pub async fn wait_for_job(&self, job_id: &JobId, timeout: Duration) -> GraphResult<WorkspaceJob> {
        self.restyle.wait_for_job(job_id, timeout).await
    }

    pub async fn job_counts(&self, workspace: &str) -> GraphResult<JobCounts> {
        self.restyle.job_counts(workspace).await
    }

    // ---- workspaces ----

    pub async fn create_workspace(&self, title: &str, style: &str, user: &str) -> GraphResult<WorkspaceId> {
        self.workspaces.create_workspace(title, style, user).await
    }

    pub async fn check_workspace(&self, workspace: &str, user: &str) -> GraphResult<Option<WorkspaceStyle>> {
        self.workspaces.check_workspace(workspace, user).await
    }

    pub async fn update_workspace(
        &self,
        workspace: &str,
        user: &str,
        title: Option<&str>,
        style: Option<&str>,
    ) -> GraphResult<&'static str> {
        self.workspaces.update_workspace(workspace, user, title, style).await
    }

    pub async fn delete_workspace(&self, workspace: &str, user: &str) -> GraphResult<()> {
        self.workspaces.delete_workspace(workspace, user).await
    }

    pub async fn list_workspaces(&self, user: &str) -> GraphResult<Vec<Workspace>> {
        self.workspaces.list_workspaces(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::engine::tests::ScriptedSimilarity;

    #[test]
    fn test_build_success() {
        let app = AppBuilder::new(AppConfig::default())
            .with_in_memory_stores()
            .similarity(Arc::new(ScriptedSimilarity::default()))
            .build();
        assert!(app.is_ok());
    }

    #[test]
    fn test_build_missing_ports() {
        let app = AppBuilder::new(AppConfig::default())
            .connections(Arc::new(InMemoryConnectionStore::new()))
            .jobs(Arc::new(InMemoryJobLedger::new()))
            .build();
        assert!(matches!(
            app,
            Err(BuildError::MissingPorts(missing)) if missing == vec!["similarity", "workspaces", "projects"]
        ));
    }

    #[test]
    fn test_build_applies_top_n() {
        let config = AppConfig {
            similar_top_n: 9,
            ..AppConfig::default()
        };
        let app = AppBuilder::new(config)
            .with_in_memory_stores()
            .similarity(Arc::new(ScriptedSimilarity::default()))
            .build()
            .unwrap();
        assert_eq!(app.engine().top_n(), 9);
        assert_eq!(app.config().similar_top_n, 9);
    }
}
