//! InMemoryConnectionStore - 開発用・テスト用のコネクションストア
//!
//! # 実装詳細
//! - BTreeMap<ConnectionKey, Connection> で複合キーの一意性を保証
//! - tokio の Mutex で排他制御（ロックを保持したまま他の await をしない）

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionKey, ConnectionStatus, WorkspaceId};
use crate::ports::{ConnectionFilter, ConnectionStore, StoreError};

#[derive(Clone, Default)]
pub struct InMemoryConnectionStore {
    records: Arc<Mutex<BTreeMap<ConnectionKey, Connection>>>,
}

impl InMemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record, ordered by key.
    pub async fn all(&self) -> Vec<Connection> {
        self.records.lock().await.values().cloned().collect()
    }

    pub async fn get(&self, key: &ConnectionKey) -> Option<Connection> {
        self.records.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl ConnectionStore for InMemoryConnectionStore {
    async fn insert(&self, connection: Connection) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let key = connection.key();
        if records.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "{} -> {} in {}",
                key.source_id, key.target_id, key.workspace_id
            )));
        }
        records.insert(key, connection);
        Ok(())
    }

    async fn upsert(&self, connection: Connection) -> Result<(), StoreError> {
        self.records.lock().await.insert(connection.key(), connection);
        Ok(())
    }

    async fn set_status(
        &self,
        key: &ConnectionKey,
        status: ConnectionStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        Ok(records
            .get_mut(key)
            .is_some_and(|record| record.set_status(status, now)))
    }

    async fn bulk_set_status(
        &self,
        workspace: &WorkspaceId,
        from: &[ConnectionStatus],
        to: ConnectionStatus,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.lock().await;
        let mut updated = 0;
        for record in records
            .values_mut()
            .filter(|r| r.workspace_id == *workspace && from.contains(&r.status))
        {
            if record.set_status(to, now) {
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn bulk_delete(
        &self,
        workspace: &WorkspaceId,
        filter: &ConnectionFilter,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, r| !(r.workspace_id == *workspace && filter.matches(r)));
        Ok((before - records.len()) as u64)
    }

    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<Connection>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|r| r.workspace_id == *workspace)
            .cloned()
            .collect())
    }
}
