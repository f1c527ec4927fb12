//! Graph compilation error.

use thiserror::Error;

/// Error when compiling a state graph (edge references an unknown node, missing
/// entry or exit, ambiguous routing).
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Neither an edge nor a conditional path leads to END.
    #[error("graph must have a path to END")]
    MissingEnd,

    /// More than one edge leaves the same node.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a valid node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
