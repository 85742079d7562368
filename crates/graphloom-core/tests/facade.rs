//! App の公開操作を通したシナリオテスト

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use graphloom_core::app::{App, AppBuilder, AppConfig};
use graphloom_core::domain::{ConnectionStatus, ErrorKind, JobStatus, WorkspaceId};
use graphloom_core::ports::{CollaboratorError, SimilarityClient};

const A: &str = "6517a2624a081a27e7d0f92a";
const B: &str = "6517a2624a081a27e7d0f92b";
const C: &str = "6517a2624a081a27e7d0f92c";

/// 全ワークスペース共通で A, B, C を返す類似度サービス
struct Fixture {
    similar: HashMap<&'static str, Vec<&'static str>>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            similar: HashMap::from([(A, vec![B, C, A]), (B, vec![C]), (C, vec![])]),
        }
    }
}

#[async_trait]
impl SimilarityClient for Fixture {
    async fn similar_to(
        &self,
        document_id: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(self
            .similar
            .get(document_id)
            .map(|ids| ids.iter().take(top_n).map(|id| id.to_string()).collect())
            .unwrap_or_default())
    }

    async fn similar_to_content(
        &self,
        _content: &str,
        _top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(vec![C.to_owned()])
    }

    async fn list_document_ids(
        &self,
        _workspace: &WorkspaceId,
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(vec![A.to_owned(), B.to_owned(), C.to_owned()])
    }
}

fn app() -> App {
    AppBuilder::new(AppConfig::default())
        .with_in_memory_stores()
        .similarity(Arc::new(Fixture::new()))
        .build()
        .unwrap()
}

fn edges(graph: &graphloom_core::domain::WorkspaceGraph) -> Vec<(String, String, ConnectionStatus)> {
    let mut edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.source_id.clone(), e.target_id.clone(), e.status))
        .collect();
    edges.sort();
    edges
}

#[tokio::test]
async fn new_document_scenario() {
    let app = app();
    let created = app.on_document_created(A, "W").await.unwrap();
    assert_eq!(created.len(), 2);

    let graph = app.get_workspace_graph("W").await.unwrap();
    assert_eq!(
        edges(&graph),
        vec![
            (A.to_owned(), B.to_owned(), ConnectionStatus::Pending),
            (A.to_owned(), C.to_owned(), ConnectionStatus::Pending),
        ]
    );
    assert_eq!(graph.nodes.len(), 3);
}

#[tokio::test]
async fn confirm_edit_and_delete_through_the_facade() {
    let app = app();
    app.auto_connect_workspace("W").await.unwrap();

    app.confirm_connection(A, B, "W").await.unwrap();
    app.edit_connection(B, A, "W").await.unwrap();
    assert_eq!(app.confirm_all_connections("W").await.unwrap(), 3);

    app.edit_connection(A, C, "W").await.unwrap();
    assert_eq!(app.clear_pending_connections("W").await.unwrap(), 1);

    assert_eq!(app.on_document_deleted(A, "W").await.unwrap(), 2);
    let graph = app.get_workspace_graph("W").await.unwrap();
    assert_eq!(
        edges(&graph),
        vec![(B.to_owned(), C.to_owned(), ConnectionStatus::Confirmed)]
    );
}

#[tokio::test]
async fn restyle_round_trip() {
    let app = app();
    let ws = app.create_workspace("Reading Notes", "generic", "u1").await.unwrap();

    let receipt = app
        .change_workspace_style(ws.as_str(), "u1", "zettel")
        .await
        .unwrap();
    let job = app
        .wait_for_job(&receipt.job_id, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Success);
    assert_eq!(
        app.check_workspace(ws.as_str(), "u1").await.unwrap(),
        Some(graphloom_core::domain::WorkspaceStyle::Zettel)
    );
    // A→B, A→C, B→C
    assert_eq!(app.get_workspace_graph(ws.as_str()).await.unwrap().edges.len(), 3);

    let receipt = app
        .change_workspace_style(ws.as_str(), "u1", "para")
        .await
        .unwrap();
    let job = app
        .wait_for_job(&receipt.job_id, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Success);
    assert!(app.get_workspace_graph(ws.as_str()).await.unwrap().edges.is_empty());

    let counts = app.job_counts(ws.as_str()).await.unwrap();
    assert_eq!(counts.success, 2);
    assert_eq!(app.jobs_for_workspace(ws.as_str()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn errors_keep_their_kind() {
    let app = app();
    let err = app.confirm_connection("bogus", B, "W").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = app
        .change_workspace_style("6517a2624a081a27e7d0f9ff", "u1", "zettel")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = app.delete_workspace("missing", "u1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn suggestions_do_not_create_edges() {
    let app = app();
    let ids = app.engine().suggest_for_content("graph theory").await.unwrap();
    assert_eq!(ids.len(), 1);
    assert!(app.get_workspace_graph("W").await.unwrap().edges.is_empty());
}
