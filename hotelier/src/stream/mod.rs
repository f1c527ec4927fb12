//! Streaming events emitted by `CompiledStateGraph::stream`.
//!
//! The session adapter consumes these to observe every intermediate state of the
//! agent loop; a front-end can use `Updates` to show which phase just ran.

use std::collections::HashSet;

/// Which events a stream should carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full state after each node.
    Values,
    /// Node id plus state after each node.
    Updates,
}

impl StreamMode {
    /// Both modes; what the session adapter uses.
    pub fn all() -> HashSet<StreamMode> {
        HashSet::from([StreamMode::Values, StreamMode::Updates])
    }
}

/// One streamed event from a graph run.
#[derive(Clone, Debug)]
pub enum StreamEvent<S> {
    /// Full state after a node ran.
    Values(S),
    /// The node that just ran and the state it produced.
    Updates { node_id: String, state: S },
    /// The run stopped with an error; no further events follow.
    Error(String),
}
