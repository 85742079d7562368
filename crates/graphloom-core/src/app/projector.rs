//! GraphProjector - ワークスペースのグラフ（ノード + エッジ）を組み立てる
//!
//! ノードのタイトルは空のまま。ドキュメント本体とは結合しない。

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{DocumentId, GraphEdge, GraphError, GraphNode, GraphResult, WorkspaceGraph};
use crate::ports::ConnectionStore;

use super::engine::parse_workspace;

#[derive(Clone)]
pub struct GraphProjector {
    connections: Arc<dyn ConnectionStore>,
}

impl GraphProjector {
    pub fn new(connections: Arc<dyn ConnectionStore>) -> Self {
        Self { connections }
    }

    pub async fn project_workspace_graph(&self, workspace_id: &str) -> GraphResult<WorkspaceGraph> {
        let workspace = parse_workspace(workspace_id)?;
        let connections = self
            .connections
            .list_by_workspace(&workspace)
            .await
            .map_err(GraphError::store("failed to fetch connections"))?;

        let endpoints: BTreeSet<DocumentId> = connections
            .iter()
            .flat_map(|c| [c.source_id, c.target_id])
            .collect();

        Ok(WorkspaceGraph {
            nodes: endpoints
                .into_iter()
                .map(|id| GraphNode {
                    id: id.to_string(),
                    title: String::new(),
                })
                .collect(),
            edges: connections.iter().map(GraphEdge::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::engine::tests::doc;
    use crate::domain::{Connection, ConnectionKey, ConnectionStatus, WorkspaceId};
    use crate::impls::InMemoryConnectionStore;
    use chrono::Utc;

    async fn seed(store: &InMemoryConnectionStore, s: u8, t: u8, w: &str, status: ConnectionStatus) {
        store
            .upsert(Connection::new(
                ConnectionKey::new(
                    doc(s).parse().unwrap(),
                    doc(t).parse().unwrap(),
                    WorkspaceId::parse(w).unwrap(),
                ),
                status,
                Utc::now(),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn nodes_are_deduplicated_endpoints() {
        let store = InMemoryConnectionStore::new();
        seed(&store, 1, 2, "W", ConnectionStatus::Pending).await;
        seed(&store, 1, 3, "W", ConnectionStatus::Confirmed).await;
        seed(&store, 3, 2, "W", ConnectionStatus::Pending).await;
        seed(&store, 4, 5, "V", ConnectionStatus::Pending).await;

        let graph = GraphProjector::new(Arc::new(store))
            .project_workspace_graph("W")
            .await
            .unwrap();

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec![doc(1), doc(2), doc(3)]);
        assert!(graph.nodes.iter().all(|n| n.title.is_empty()));
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.contains(&GraphEdge {
            source_id: doc(1),
            target_id: doc(3),
            status: ConnectionStatus::Confirmed,
        }));
    }

    #[tokio::test]
    async fn empty_workspace_projects_empty_graph() {
        let graph = GraphProjector::new(Arc::new(InMemoryConnectionStore::new()))
            .project_workspace_graph("W")
            .await
            .unwrap();
        assert_eq!(graph, WorkspaceGraph::default());
    }

    #[test]
    fn graph_serializes_camel_case_edges() {
        let graph = WorkspaceGraph {
            nodes: vec![GraphNode {
                id: doc(1),
                title: String::new(),
            }],
            edges: vec![GraphEdge {
                source_id: doc(1),
                target_id: doc(2),
                status: ConnectionStatus::Pending,
            }],
        };
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["edges"][0]["sourceId"], doc(1));
        assert_eq!(json["edges"][0]["status"], "pending");
    }
}
