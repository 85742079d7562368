//! RestyleOrchestrator - ワークスペースのスタイル変更と非同期ジョブ
//!
//! # 流れ
//! ```text
//! received → validated → persisted → job-queued → {success | failed}
//! ```
//! 1. 入力検証（空白・未知のスタイルは InvalidArgument）
//! 2. スタイルを所有者フィルタ付きで永続化（失敗したらジョブは作らない）
//! 3. pending のジョブを台帳に記録
//! 4. バックグラウンドタスクを spawn し、すぐに job id を返す
//!
//! バックグラウンドタスクは呼び出し元のキャンセルを引き継がない。
//! 結果は台帳の終端ステータスを読むことでしか観測できない。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::{
    GraphError, GraphResult, JobId, JobStatus, RestyleAction, UserId, WorkspaceId, WorkspaceJob,
    WorkspacePatch, WorkspaceStyle,
};
use crate::observability::JobCounts;
use crate::ports::{Clock, IdGenerator, JobLedger, WorkspaceStore};

use super::engine::{GraphEngine, parse_workspace};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 受理したスタイル変更の控え
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestyleReceipt {
    pub job_id: JobId,
    pub style: WorkspaceStyle,
    pub message: String,
}

#[derive(Clone)]
pub struct RestyleOrchestrator {
    engine: GraphEngine,
    workspaces: Arc<dyn WorkspaceStore>,
    jobs: Arc<dyn JobLedger>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl RestyleOrchestrator {
    pub fn new(
        engine: GraphEngine,
        workspaces: Arc<dyn WorkspaceStore>,
        jobs: Arc<dyn JobLedger>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            workspaces,
            jobs,
            ids,
            clock,
        }
    }

    pub async fn change_workspace_style(
        &self,
        workspace_id: &str,
        user_id: &str,
        new_style: &str,
    ) -> GraphResult<RestyleReceipt> {
        if workspace_id.trim().is_empty() {
            return Err(GraphError::InvalidArgument("workspaceID is blank".into()));
        }
        if new_style.trim().is_empty() {
            return Err(GraphError::InvalidArgument("newStyle is blank".into()));
        }
        let workspace = parse_workspace(workspace_id)?;
        let user = UserId::parse(user_id).map_err(GraphError::invalid_id("user"))?;
        let style: WorkspaceStyle = new_style
            .parse()
            .map_err(|e: crate::domain::UnknownStyle| GraphError::InvalidArgument(e.to_string()))?;

        let outcome = self
            .workspaces
            .update(&workspace, &user, &WorkspacePatch::style(style), self.clock.now())
            .await
            .map_err(GraphError::store("failed to update workspace type"))?;
        if !outcome.matched {
            return Err(GraphError::WorkspaceNotFound);
        }

        let job = WorkspaceJob::pending(
            self.ids.generate_job_id(),
            workspace.clone(),
            style,
            self.clock.now(),
        );
        let job_id = job.id;
        if let Err(err) = self.jobs.insert(job).await {
            warn!(
                workspace_id = %workspace,
                style = %style,
                "style persisted but no job was recorded"
            );
            return Err(GraphError::store("failed to create queueing history")(err));
        }
        info!(job_id = %job_id, workspace_id = %workspace, style = %style, "restyle job queued");

        let task = self.clone();
        let action = style.restyle_action();
        tokio::spawn(async move {
            task.run_job(job_id, workspace, action).await;
        });

        Ok(RestyleReceipt {
            job_id,
            style,
            message: format!("changed to workspace type: '{style}'. (async works: {job_id})"),
        })
    }

    async fn run_job(&self, job_id: JobId, workspace: WorkspaceId, action: RestyleAction) {
        let result = match action {
            RestyleAction::AutoConnect => self
                .engine
                .auto_connect_workspace(workspace.as_str())
                .await
                .map(|edges| edges.len() as u64),
            RestyleAction::ClearPending => self.engine.clear_pending(workspace.as_str()).await,
        };

        let status = match &result {
            Ok(affected) => {
                info!(job_id = %job_id, workspace_id = %workspace, ?action, affected, "restyle job succeeded");
                JobStatus::Success
            }
            Err(err) => {
                error!(job_id = %job_id, workspace_id = %workspace, ?action, error = %err, "restyle job failed");
                JobStatus::Failed
            }
        };

        match self.jobs.set_status(&job_id, status, self.clock.now()).await {
            Ok(true) => {}
            Ok(false) => error!(job_id = %job_id, "job record missing, terminal status dropped"),
            Err(err) => error!(job_id = %job_id, error = %err, "failed to record job status"),
        }
    }

    pub async fn job(&self, job_id: &str) -> GraphResult<Option<WorkspaceJob>> {
        let id: JobId = job_id.parse().map_err(GraphError::invalid_id("job"))?;
        self.jobs
            .get(&id)
            .await
            .map_err(GraphError::store("failed to read job"))
    }

    pub async fn jobs_for_workspace(&self, workspace_id: &str) -> GraphResult<Vec<WorkspaceJob>> {
        let workspace = parse_workspace(workspace_id)?;
        self.jobs
            .list_by_workspace(&workspace)
            .await
            .map_err(GraphError::store("failed to list jobs"))
    }

    pub async fn job_counts(&self, workspace_id: &str) -> GraphResult<JobCounts> {
        let jobs = self.jobs_for_workspace(workspace_id).await?;
        Ok(JobCounts::tally(&jobs))
    }

    /// 終端ステータスになるまで台帳をポーリングする。
    ///
    /// タイムアウトした場合は最後に読んだレコード（pending のまま）を返す。
    pub async fn wait_for_job(&self, job_id: &JobId, timeout: Duration) -> GraphResult<WorkspaceJob> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let job = self
                .jobs
                .get(job_id)
                .await
                .map_err(GraphError::store("failed to read job"))?
                .ok_or_else(|| GraphError::InvalidArgument(format!("unknown job {job_id}")))?;
            if job.status.is_terminal() || tokio::time::Instant::now() >= deadline {
                return Ok(job);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
