//! Connection - ドキュメント間の有向エッジとそのステータス
//!
//! # 状態遷移
//! - (none) → Pending: auto-connect が提案、または edit で再作成
//! - Pending → Confirmed: confirm / confirm_all
//! - Edited → Confirmed: confirm / confirm_all
//! - Confirmed → Pending は存在しない（edit による再作成を除く）
//!
//! Edited はスキーマ上存在するが、edit 操作は Pending で再作成する。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DocumentId, WorkspaceId};

/// Status of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Proposed by similarity discovery, awaiting user action.
    Pending,

    /// Manually edited by the user.
    Edited,

    /// Accepted as a permanent graph relation.
    Confirmed,
}

impl ConnectionStatus {
    /// Statuses that `confirm_all` promotes to `Confirmed`.
    pub const CONFIRMABLE: [ConnectionStatus; 2] =
        [ConnectionStatus::Pending, ConnectionStatus::Edited];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Edited => "edited",
            ConnectionStatus::Confirmed => "confirmed",
        }
    }

    /// Can a record in `self` move to `next` through a status update?
    ///
    /// Re-creation by edit bypasses this check; it replaces the record.
    pub fn can_transition_to(self, next: ConnectionStatus) -> bool {
        match (self, next) {
            (ConnectionStatus::Pending | ConnectionStatus::Edited, ConnectionStatus::Confirmed) => {
                true
            }
            (current, next) => current == next,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "edited" => Ok(ConnectionStatus::Edited),
            "confirmed" => Ok(ConnectionStatus::Confirmed),
            other => Err(format!("unknown connection status: {other}")),
        }
    }
}

/// Composite identity of a connection: unique per workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionKey {
    pub source_id: DocumentId,
    pub target_id: DocumentId,
    pub workspace_id: WorkspaceId,
}

impl ConnectionKey {
    pub fn new(source_id: DocumentId, target_id: DocumentId, workspace_id: WorkspaceId) -> Self {
        Self {
            source_id,
            target_id,
            workspace_id,
        }
    }

    /// Does this edge start or end at `document`?
    pub fn touches(&self, document: &DocumentId) -> bool {
        self.source_id == *document || self.target_id == *document
    }
}

/// A directed relationship between two documents of one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source_id: DocumentId,
    pub target_id: DocumentId,
    pub workspace_id: WorkspaceId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// Fresh record; both timestamps set to `now`.
    pub fn new(key: ConnectionKey, status: ConnectionStatus, now: DateTime<Utc>) -> Self {
        Self {
            source_id: key.source_id,
            target_id: key.target_id,
            workspace_id: key.workspace_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pending(key: ConnectionKey, now: DateTime<Utc>) -> Self {
        Self::new(key, ConnectionStatus::Pending, now)
    }

    pub fn key(&self) -> ConnectionKey {
        ConnectionKey::new(self.source_id, self.target_id, self.workspace_id.clone())
    }

    /// 遷移表に無い変更は拒否し、レコードには触れない
    pub fn set_status(&mut self, status: ConnectionStatus, now: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(status) {
            return false;
        }
        self.status = status;
        self.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key() -> ConnectionKey {
        ConnectionKey::new(
            "6517a2624a081a27e7d0f92a".parse().unwrap(),
            "6517a2624a081a27e7d0f92b".parse().unwrap(),
            WorkspaceId::parse("ws").unwrap(),
        )
    }

    #[rstest]
    #[case::pending_to_confirmed(ConnectionStatus::Pending, ConnectionStatus::Confirmed, true)]
    #[case::edited_to_confirmed(ConnectionStatus::Edited, ConnectionStatus::Confirmed, true)]
    #[case::confirmed_idempotent(ConnectionStatus::Confirmed, ConnectionStatus::Confirmed, true)]
    #[case::confirmed_to_pending(ConnectionStatus::Confirmed, ConnectionStatus::Pending, false)]
    #[case::pending_to_edited(ConnectionStatus::Pending, ConnectionStatus::Edited, false)]
    #[case::edited_to_pending(ConnectionStatus::Edited, ConnectionStatus::Pending, false)]
    fn transition_table(
        #[case] from: ConnectionStatus,
        #[case] to: ConnectionStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        assert_eq!("edited".parse::<ConnectionStatus>(), Ok(ConnectionStatus::Edited));
        assert!("edit".parse::<ConnectionStatus>().is_err());
    }

    #[test]
    fn pending_connection_uses_same_timestamp() {
        let now = Utc::now();
        let conn = Connection::pending(key(), now);
        assert_eq!(conn.status, ConnectionStatus::Pending);
        assert_eq!(conn.created_at, conn.updated_at);
        assert_eq!(conn.key(), key());
    }

    #[test]
    fn set_status_only_moves_updated_at() {
        let created = Utc::now();
        let mut conn = Connection::pending(key(), created);
        let later = created + chrono::Duration::seconds(5);
        assert!(conn.set_status(ConnectionStatus::Confirmed, later));
        assert_eq!(conn.created_at, created);
        assert_eq!(conn.updated_at, later);
    }

    #[test]
    fn set_status_refuses_to_reopen_a_confirmed_edge() {
        let created = Utc::now();
        let mut conn = Connection::new(key(), ConnectionStatus::Confirmed, created);
        let later = created + chrono::Duration::seconds(5);
        assert!(!conn.set_status(ConnectionStatus::Pending, later));
        assert_eq!(conn.status, ConnectionStatus::Confirmed);
        assert_eq!(conn.updated_at, created);
    }

    #[test]
    fn key_touches_both_endpoints() {
        let k = key();
        assert!(k.touches(&k.source_id));
        assert!(k.touches(&k.target_id));
        assert!(!k.touches(&"6517a2624a081a27e7d0f92c".parse().unwrap()));
    }
}
