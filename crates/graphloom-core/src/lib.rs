//! graphloom-core
//!
//! ワークスペース内のドキュメント同士をつなぐグラフエンジン。
//! 類似度サービスが提案したエッジを pending で作り、確認されると confirmed になる。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, connection, style, workspace, job, graph, errors）
//! - **ports**: 抽象化レイヤー（ConnectionStore, SimilarityClient, WorkspaceStore, JobLedger, ProjectProvider, Clock, IdGenerator）
//! - **impls**: 実装（インメモリのストア、HTTP の類似度クライアント）
//! - **app**: アプリケーションロジック（engine, restyle, projector, workspace, config, builder）
//! - **observability**: ジョブの集計ビュー

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
