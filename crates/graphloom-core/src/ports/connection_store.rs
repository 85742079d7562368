//! ConnectionStore port - コネクションレコードの正本
//!
//! レコードは (source, target, workspace) の複合キーで一意。
//!
//! # 設計原則
//! - 単一レコードの insert / upsert / update はアトミック
//! - 一括更新・一括削除はそれぞれ 1 回のストア操作で表現する
//! - レコードをまたぐトランザクションは使わない

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Connection, ConnectionKey, ConnectionStatus, DocumentId, WorkspaceId};

use super::StoreError;

/// Which records of a workspace a bulk delete removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFilter {
    /// Every record of the workspace.
    All,

    /// Records whose status is one of these.
    Statuses(Vec<ConnectionStatus>),

    /// Records where the document is the source or the target.
    TouchingDocument(DocumentId),
}

impl ConnectionFilter {
    pub fn matches(&self, conn: &Connection) -> bool {
        match self {
            ConnectionFilter::All => true,
            ConnectionFilter::Statuses(statuses) => statuses.contains(&conn.status),
            ConnectionFilter::TouchingDocument(document) => conn.key().touches(document),
        }
    }
}

#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Insert a new record; `StoreError::Duplicate` if the key exists.
    async fn insert(&self, connection: Connection) -> Result<(), StoreError>;

    /// Insert or overwrite the full record identified by its composite key.
    async fn upsert(&self, connection: Connection) -> Result<(), StoreError>;

    /// Update status and `updated_at` only. Returns false when no record matched
    /// or the current status cannot move to `status`; the record is then left as is.
    async fn set_status(
        &self,
        key: &ConnectionKey,
        status: ConnectionStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Move every record of `workspace` whose status is in `from` to `to`.
    /// Returns the number of records updated; illegal moves are skipped.
    async fn bulk_set_status(
        &self,
        workspace: &WorkspaceId,
        from: &[ConnectionStatus],
        to: ConnectionStatus,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Delete every record of `workspace` matching `filter`. Returns the count deleted.
    async fn bulk_delete(
        &self,
        workspace: &WorkspaceId,
        filter: &ConnectionFilter,
    ) -> Result<u64, StoreError>;

    /// All records of `workspace`; order is not significant.
    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<Connection>, StoreError>;
}
