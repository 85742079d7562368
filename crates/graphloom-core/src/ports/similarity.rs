//! SimilarityClient port - 外部の類似度サービス / ドキュメント一覧サービス
//!
//! 返される ID は未検証の文字列のまま。問い合わせたドキュメント自身の ID や
//! 不正な ID が混ざることがあり、フィルタはエンジンの責務。

use async_trait::async_trait;

use crate::domain::WorkspaceId;

/// Failure talking to a collaborator service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("failed to call {service} service: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} service returned non-200 status: {status}")]
    Status { service: &'static str, status: u16 },

    #[error("failed to parse {service} service response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

#[async_trait]
pub trait SimilarityClient: Send + Sync {
    /// Up to `top_n` documents similar to an existing document.
    async fn similar_to(
        &self,
        document_id: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError>;

    /// Up to `top_n` documents similar to free text.
    async fn similar_to_content(
        &self,
        content: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError>;

    /// Every document id of a workspace.
    async fn list_document_ids(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<String>, CollaboratorError>;
}
