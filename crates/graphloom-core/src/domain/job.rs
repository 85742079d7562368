//! Workspace job record and status management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{JobId, WorkspaceId};
use super::style::WorkspaceStyle;

/// Job status.
///
/// State transitions:
/// - Pending -> Success
/// - Pending -> Failed
///
/// Exactly one terminal write happens per job; nothing retries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted; background work not finished yet.
    Pending,

    /// Background work completed.
    Success,

    /// Background work returned an error.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }
}

/// Audit record of one asynchronous restyle.
///
/// Design:
/// - Written `Pending` in the request that accepted the restyle
/// - Updated once by the background task
/// - A one-shot audit trail, not a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceJob {
    pub id: JobId,
    pub workspace_id: WorkspaceId,
    pub target_style: WorkspaceStyle,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkspaceJob {
    pub fn pending(
        id: JobId,
        workspace_id: WorkspaceId,
        target_style: WorkspaceStyle,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            workspace_id,
            target_style,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn finish(&mut self, status: JobStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    #[test]
    fn new_job_starts_pending() {
        let now = Utc::now();
        let job = WorkspaceJob::pending(
            JobId::from_ulid(Ulid::new()),
            WorkspaceId::parse("ws").unwrap(),
            WorkspaceStyle::Zettel,
            now,
        );
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.created_at, now);
    }

    #[rstest]
    #[case::pending(JobStatus::Pending, false)]
    #[case::success(JobStatus::Success, true)]
    #[case::failed(JobStatus::Failed, true)]
    fn terminal_statuses(#[case] status: JobStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn finish_moves_updated_at_only() {
        let now = Utc::now();
        let mut job = WorkspaceJob::pending(
            JobId::from_ulid(Ulid::new()),
            WorkspaceId::parse("ws").unwrap(),
            WorkspaceStyle::Para,
            now,
        );
        let later = now + chrono::Duration::seconds(1);
        job.finish(JobStatus::Failed, later);
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.created_at, now);
        assert_eq!(job.updated_at, later);
    }

    #[test]
    fn job_serializes_for_status_views() {
        let job = WorkspaceJob::pending(
            JobId::from_ulid(Ulid::new()),
            WorkspaceId::parse("ws").unwrap(),
            WorkspaceStyle::Zettel,
            Utc::now(),
        );
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["targetStyle"], "zettel");
        assert_eq!(value["workspaceId"], "ws");
    }
}
