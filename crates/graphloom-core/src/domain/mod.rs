//! Domain model (IDs, connections, workspaces, jobs, graph views, errors).

pub mod connection;
pub mod errors;
pub mod graph;
pub mod ids;
pub mod job;
pub mod style;
pub mod workspace;

pub use self::connection::{Connection, ConnectionKey, ConnectionStatus};
pub use self::errors::{ErrorKind, GraphError, GraphResult};
pub use self::graph::{GraphEdge, GraphNode, WorkspaceGraph};
pub use self::ids::{DocumentId, IdParseError, JobId, ObjectId, UserId, WorkspaceId};
pub use self::job::{JobStatus, WorkspaceJob};
pub use self::style::{RestyleAction, UnknownStyle, WorkspaceStyle};
pub use self::workspace::{ProjectBinding, Workspace, WorkspacePatch, project_name};
