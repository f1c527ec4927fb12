//! Next-step result from a graph node: continue along the edges, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's outgoing edge (or END if it has none).
/// - **Node(id)**: jump to the given node.
/// - **End**: stop; the current state is the final result.
///
/// Ignored for nodes with conditional edges; the router decides there.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    Continue,
    Node(String),
    End,
}
