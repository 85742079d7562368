//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **GraphEngine**: コネクションの状態遷移と自動接続
//! - **RestyleOrchestrator**: スタイル変更とバックグラウンドジョブ
//! - **GraphProjector**: グラフの読み出し
//! - **WorkspaceService**: ワークスペースの CRUD
//! - **AppBuilder / App**: ワイヤリングと公開操作の窓口

pub mod builder;
pub mod config;
pub mod engine;
pub mod projector;
pub mod restyle;
pub mod workspace;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::{AppConfig, CollaboratorConfig, ConfigError};
pub use self::engine::GraphEngine;
pub use self::projector::GraphProjector;
pub use self::restyle::{RestyleOrchestrator, RestyleReceipt};
pub use self::workspace::WorkspaceService;
