//! Read-side graph shapes.

use serde::{Deserialize, Serialize};

use super::connection::{Connection, ConnectionStatus};

/// A document in the projected graph. `title` is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub status: ConnectionStatus,
}

impl From<&Connection> for GraphEdge {
    fn from(conn: &Connection) -> Self {
        Self {
            source_id: conn.source_id.to_string(),
            target_id: conn.target_id.to_string(),
            status: conn.status,
        }
    }
}

/// Whole workspace graph, unpaginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
