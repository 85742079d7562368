//! Ports - 抽象化レイヤー
//!
//! 外部システム（ドキュメントストア、類似度サービス、共同編集プロバイダ）への
//! インターフェースを定義し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ストアはレコード単位でアトミック、レコードをまたぐトランザクションはない
//! - すべての trait は `Send + Sync`（`Arc<dyn _>` でバックグラウンドタスクに渡す）

pub mod clock;
pub mod connection_store;
pub mod id_generator;
pub mod job_ledger;
pub mod project_provider;
pub mod similarity;
pub mod store_error;
pub mod workspace_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::connection_store::{ConnectionFilter, ConnectionStore};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::job_ledger::JobLedger;
pub use self::project_provider::{Project, ProjectError, ProjectProvider, ProjectUpdate};
pub use self::similarity::{CollaboratorError, SimilarityClient};
pub use self::store_error::StoreError;
pub use self::workspace_store::{UpdateOutcome, WorkspaceStore};
