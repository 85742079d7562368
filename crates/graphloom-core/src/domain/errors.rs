//! Errors - エラー型と分類
//!
//! 呼び出し側（HTTP 層など）は種別を区別せずに失敗として扱ってよいが、
//! エンジンが返すエラーは `ErrorKind` で分類できる状態を保つ。

use crate::ports::{CollaboratorError, ProjectError, StoreError};

use super::ids::IdParseError;

/// ErrorKind はエラーの分類
///
/// - InvalidArgument: 入力不正（同期的に返す、リトライしない）
/// - Collaborator: 類似度サービス / ドキュメント一覧サービスの失敗
/// - Store: 永続化の失敗
/// - NotFound: 対象のワークスペースが存在しない、または所有者が違う
/// - Provider: 共同編集プロジェクトの失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Collaborator,
    Store,
    NotFound,
    Provider,
}

/// GraphError はエンジン・オーケストレータ・ワークスペースサービス共通のエラー
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid {field} id: {source}")]
    InvalidIdentifier {
        field: &'static str,
        #[source]
        source: IdParseError,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("workspace not found or unauthorized")]
    WorkspaceNotFound,

    #[error("{context}: {source}")]
    Collaborator {
        context: &'static str,
        #[source]
        source: CollaboratorError,
    },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{context}: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: ProjectError,
    },
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::InvalidIdentifier { .. } | GraphError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            GraphError::WorkspaceNotFound => ErrorKind::NotFound,
            GraphError::Collaborator { .. } => ErrorKind::Collaborator,
            GraphError::Store { .. } => ErrorKind::Store,
            GraphError::Provider { .. } => ErrorKind::Provider,
        }
    }

    pub fn invalid_id(field: &'static str) -> impl FnOnce(IdParseError) -> GraphError {
        move |source| GraphError::InvalidIdentifier { field, source }
    }

    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> GraphError {
        move |source| GraphError::Store { context, source }
    }

    pub fn collaborator(context: &'static str) -> impl FnOnce(CollaboratorError) -> GraphError {
        move |source| GraphError::Collaborator { context, source }
    }

    pub fn provider(context: &'static str) -> impl FnOnce(ProjectError) -> GraphError {
        move |source| GraphError::Provider { context, source }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_names_the_field() {
        let err = "nope"
            .parse::<crate::domain::DocumentId>()
            .map_err(GraphError::invalid_id("source"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().starts_with("invalid source id"));
    }

    #[test]
    fn store_errors_keep_context() {
        let err = GraphError::store("failed to create queueing history")(StoreError::Unavailable(
            "insert job failed".into(),
        ));
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(err.to_string().contains("insert job failed"));
        assert!(err.to_string().starts_with("failed to create queueing history"));
    }

    #[test]
    fn collaborator_errors_are_classified() {
        let err = GraphError::collaborator("failed to fetch workspace doc IDs")(
            CollaboratorError::Status {
                service: "document",
                status: 503,
            },
        );
        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }
}
