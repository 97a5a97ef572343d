use thiserror::Error;

/// Conditions a routing query or graph construction can fail with.
///
/// An unreachable goal is not an error, it is reported through an empty
/// [`SearchResult`](crate::search::SearchResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// Start or goal does not exist in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// An edge references a node the graph does not contain
    #[error("Edge {source_node} -> {target_node} references a node that does not exist")]
    GraphIntegrity {
        source_node: String,
        target_node: String,
    },

    /// Edges are listed for a node the graph does not contain
    #[error("Edges listed for unknown node {0}")]
    UnknownEdgeSource(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
