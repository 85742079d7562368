//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryConnectionStore / InMemoryWorkspaceStore / InMemoryJobLedger**: 開発用・テスト用のストア
//! - **InMemoryProjectProvider**: 共同編集プロバイダのスタブ
//! - **HttpSimilarityClient**: 類似度サービス / ドキュメント一覧サービスの HTTP クライアント
//!
//! 本番用のドキュメントストア実装は別クレートに置く想定です。

pub mod http_similarity;
pub mod inmem_connection_store;
pub mod inmem_job_ledger;
pub mod inmem_project;
pub mod inmem_workspace_store;

pub use self::http_similarity::HttpSimilarityClient;
pub use self::inmem_connection_store::InMemoryConnectionStore;
pub use self::inmem_job_ledger::InMemoryJobLedger;
pub use self::inmem_project::InMemoryProjectProvider;
pub use self::inmem_workspace_store::InMemoryWorkspaceStore;
