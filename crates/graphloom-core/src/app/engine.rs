//! GraphEngine - コネクションの状態遷移と自動接続
//!
//! # 状態遷移
//! ```text
//!   auto-connect / edit ──▶ pending ──confirm / confirm_all──▶ confirmed
//!                           edited  ──confirm / confirm_all──▶ confirmed
//! ```
//! - edit は常に pending で作り直す（既存の status / timestamp は上書き）
//! - confirmed から戻る経路は公開しない
//!
//! # 失敗の扱い
//! - トップレベルの ID 不正は呼び出し全体を失敗させる
//! - 候補 ID の不正、ドキュメント単位の類似度取得失敗、edge 単位の書き込み失敗は
//!   warn を出してスキップし、残りの処理を続ける
//! - エッジは「新しいドキュメント → 類似ドキュメント」の片方向のみ作る

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    Connection, ConnectionKey, ConnectionStatus, DocumentId, GraphError, GraphResult, WorkspaceId,
};
use crate::ports::{Clock, ConnectionFilter, ConnectionStore, SimilarityClient};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Clone)]
pub struct GraphEngine {
    connections: Arc<dyn ConnectionStore>,
    similarity: Arc<dyn SimilarityClient>,
    clock: Arc<dyn Clock>,
    top_n: usize,
}

pub(crate) fn parse_document(field: &'static str, raw: &str) -> GraphResult<DocumentId> {
    raw.parse().map_err(GraphError::invalid_id(field))
}

pub(crate) fn parse_workspace(raw: &str) -> GraphResult<WorkspaceId> {
    WorkspaceId::parse(raw).map_err(GraphError::invalid_id("workspace"))
}

/// 候補 ID のうち、パースできて問い合わせ元と異なるものだけを順序を保って返す
fn valid_candidates(origin: Option<&DocumentId>, candidates: Vec<String>) -> Vec<DocumentId> {
    candidates
        .into_iter()
        .filter_map(|raw| match raw.parse::<DocumentId>() {
            Ok(id) if Some(&id) == origin => None,
            Ok(id) => Some(id),
            Err(err) => {
                warn!(candidate = %raw, error = %err, "skipping malformed candidate id");
                None
            }
        })
        .collect()
}

impl GraphEngine {
    pub fn new(
        connections: Arc<dyn ConnectionStore>,
        similarity: Arc<dyn SimilarityClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            similarity,
            clock,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// 新規ドキュメントから類似ドキュメントへの pending エッジを作る。
    ///
    /// 既に同じキーのエッジがある場合は insert が失敗し、そのエッジは戻り値に含まれない。
    pub async fn on_document_created(
        &self,
        document_id: &str,
        workspace_id: &str,
    ) -> GraphResult<Vec<Connection>> {
        let document = parse_document("new document", document_id)?;
        let workspace = parse_workspace(workspace_id)?;

        let candidates = self
            .similarity
            .similar_to(&document.to_string(), self.top_n)
            .await
            .map_err(GraphError::collaborator("failed to fetch similar docs by ID"))?;

        let now = self.clock.now();
        let mut created = Vec::new();
        for target in valid_candidates(Some(&document), candidates) {
            let connection =
                Connection::pending(ConnectionKey::new(document, target, workspace.clone()), now);
            match self.connections.insert(connection.clone()).await {
                Ok(()) => created.push(connection),
                Err(err) => {
                    warn!(
                        workspace_id = %workspace,
                        source_id = %document,
                        target_id = %target,
                        error = %err,
                        "failed to insert connection, skipping"
                    );
                }
            }
        }

        info!(
            workspace_id = %workspace,
            document_id = %document,
            created = created.len(),
            "connected new document"
        );
        Ok(created)
    }

    /// ワークスペース内の全ドキュメントについて類似エッジを upsert する。
    ///
    /// ドキュメント一覧の取得失敗だけが全体を失敗させる。戻り値は処理した
    /// （既存を上書きしたものを含む）エッジの列で、一覧順・候補順を保つ。
    pub async fn auto_connect_workspace(&self, workspace_id: &str) -> GraphResult<Vec<Connection>> {
        let workspace = parse_workspace(workspace_id)?;

        let documents = self
            .similarity
            .list_document_ids(&workspace)
            .await
            .map_err(GraphError::collaborator("failed to fetch workspace doc IDs"))?;
        info!(workspace_id = %workspace, documents = documents.len(), "auto-connecting workspace");

        let mut upserted = Vec::new();
        for raw in documents {
            let document = match raw.parse::<DocumentId>() {
                Ok(id) => id,
                Err(err) => {
                    warn!(workspace_id = %workspace, document_id = %raw, error = %err, "skipping malformed document id");
                    continue;
                }
            };

            let candidates = match self
                .similarity
                .similar_to(&document.to_string(), self.top_n)
                .await
            {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!(
                        workspace_id = %workspace,
                        document_id = %document,
                        error = %err,
                        "failed to fetch similar docs, skipping document"
                    );
                    continue;
                }
            };

            let now = self.clock.now();
            let before = upserted.len();
            for target in valid_candidates(Some(&document), candidates) {
                let connection = Connection::pending(
                    ConnectionKey::new(document, target, workspace.clone()),
                    now,
                );
                match self.connections.upsert(connection.clone()).await {
                    Ok(()) => upserted.push(connection),
                    Err(err) => {
                        warn!(
                            workspace_id = %workspace,
                            source_id = %document,
                            target_id = %target,
                            error = %err,
                            "failed to upsert connection, skipping"
                        );
                    }
                }
            }
            debug!(document_id = %document, edges = upserted.len() - before, "document processed");
        }

        info!(workspace_id = %workspace, edges = upserted.len(), "auto-connect finished");
        Ok(upserted)
    }

    /// 対象が無くてもエラーにしない
    pub async fn confirm(&self, source: &str, target: &str, workspace: &str) -> GraphResult<()> {
        let key = self.key(source, target, workspace)?;
        let matched = self
            .connections
            .set_status(&key, ConnectionStatus::Confirmed, self.clock.now())
            .await
            .map_err(GraphError::store("failed to confirm connection"))?;
        if !matched {
            debug!(source_id = %key.source_id, target_id = %key.target_id, "confirm matched no connection");
        }
        Ok(())
    }

    /// 手動で張り直したエッジ。既存レコードを pending で上書きする。
    pub async fn edit(&self, source: &str, target: &str, workspace: &str) -> GraphResult<Connection> {
        let key = self.key(source, target, workspace)?;
        let connection = Connection::pending(key, self.clock.now());
        self.connections
            .upsert(connection.clone())
            .await
            .map_err(GraphError::store("failed to edit connection"))?;
        Ok(connection)
    }

    pub async fn confirm_all(&self, workspace_id: &str) -> GraphResult<u64> {
        let workspace = parse_workspace(workspace_id)?;
        let confirmed = self
            .connections
            .bulk_set_status(
                &workspace,
                &ConnectionStatus::CONFIRMABLE,
                ConnectionStatus::Confirmed,
                self.clock.now(),
            )
            .await
            .map_err(GraphError::store("failed to confirm connections"))?;
        info!(workspace_id = %workspace, confirmed, "confirmed all connections");
        Ok(confirmed)
    }

    pub async fn clear_pending(&self, workspace_id: &str) -> GraphResult<u64> {
        let workspace = parse_workspace(workspace_id)?;
        let deleted = self
            .connections
            .bulk_delete(
                &workspace,
                &ConnectionFilter::Statuses(vec![ConnectionStatus::Pending]),
            )
            .await
            .map_err(GraphError::store("failed to delete pending connections"))?;
        info!(workspace_id = %workspace, deleted, "cleared pending connections");
        Ok(deleted)
    }

    /// source / target のどちらかが該当するエッジを status に関係なく消す
    pub async fn on_document_deleted(
        &self,
        document_id: &str,
        workspace_id: &str,
    ) -> GraphResult<u64> {
        let document = parse_document("deleted document", document_id)?;
        let workspace = parse_workspace(workspace_id)?;
        let deleted = self
            .connections
            .bulk_delete(&workspace, &ConnectionFilter::TouchingDocument(document))
            .await
            .map_err(GraphError::store("failed to delete connections"))?;
        debug!(workspace_id = %workspace, document_id = %document, deleted, "removed connections of deleted document");
        Ok(deleted)
    }

    /// 自由文に似たドキュメントの ID。エッジは作らない。
    pub async fn suggest_for_content(&self, content: &str) -> GraphResult<Vec<DocumentId>> {
        if content.trim().is_empty() {
            return Err(GraphError::InvalidArgument("content is blank".into()));
        }
        let candidates = self
            .similarity
            .similar_to_content(content, self.top_n)
            .await
            .map_err(GraphError::collaborator("failed to fetch similar docs by content"))?;
        Ok(valid_candidates(None, candidates))
    }

    fn key(&self, source: &str, target: &str, workspace: &str) -> GraphResult<ConnectionKey> {
        Ok(ConnectionKey::new(
            parse_document("source", source)?,
            parse_document("target", target)?,
            parse_workspace(workspace)?,
        ))
    }
}
