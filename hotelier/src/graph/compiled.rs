//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Runs from the node wired to START; after each
//! node, a conditional router (when present) or the node's returned `Next` picks
//! the following node. Execution is strictly sequential.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Callback invoked with the node id and the state after every node.
pub type StateObserver<'a, S> = &'a mut (dyn FnMut(&str, &S) + Send);

/// Compiled graph: immutable structure, supports `invoke` and `stream`.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// First node to run (target of the START edge).
    pub(super) first_node_id: String,
    /// How to pick the next node after each node.
    pub(super) next_map: HashMap<String, NextEntry<S>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Shared run loop used by invoke(), invoke_with_observer() and stream().
    async fn run_loop_inner(
        &self,
        state: &mut S,
        mut observer: Option<StateObserver<'_, S>>,
    ) -> Result<(), AgentError> {
        log_graph_start();
        let mut current_id = self.first_node_id.clone();

        loop {
            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not found: {}", current_id))
            })?;

            log_node_start(&current_id);
            log_node_state(&current_id, state);

            let (new_state, next) = match node.run(state.clone()).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            log_node_complete(&current_id, &next);
            *state = new_state;

            if let Some(obs) = observer.as_mut() {
                obs(&current_id, state);
            }

            let next_id: Option<String> = match self.next_map.get(&current_id) {
                Some(NextEntry::Conditional(router)) => {
                    let target = router.resolve_next(state);
                    tracing::debug!(from = %current_id, to = %target, "conditional routing");
                    Some(target)
                }
                Some(NextEntry::Unconditional(to)) => match next {
                    Next::End => None,
                    Next::Node(id) => Some(id),
                    Next::Continue => Some(to.clone()),
                },
                None => match next {
                    Next::Node(id) => Some(id),
                    Next::Continue | Next::End => None,
                },
            };

            match next_id {
                Some(id) if id != END => current_id = id,
                _ => {
                    log_graph_complete();
                    return Ok(());
                }
            }
        }
    }

    /// Runs the graph to completion and returns the final state.
    ///
    /// - `Next::Continue`: follow the node's outgoing edge.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        self.invoke_with_observer(state, None).await
    }

    /// Like `invoke`, calling `observer` with every intermediate state.
    pub async fn invoke_with_observer(
        &self,
        state: S,
        observer: Option<StateObserver<'_, S>>,
    ) -> Result<S, AgentError> {
        if !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let mut state = state;
        self.run_loop_inner(&mut state, observer).await?;
        Ok(state)
    }

    /// Streams graph execution, emitting events via a channel-backed Stream.
    ///
    /// A failing run emits one `StreamEvent::Error` and closes the stream.
    pub fn stream(
        &self,
        state: S,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let (event_tx, mut event_rx) = mpsc::unbounded_channel::<StreamEvent<S>>();
            let mut observer = move |node_id: &str, s: &S| {
                if modes.contains(&StreamMode::Values) {
                    let _ = event_tx.send(StreamEvent::Values(s.clone()));
                }
                if modes.contains(&StreamMode::Updates) {
                    let _ = event_tx.send(StreamEvent::Updates {
                        node_id: node_id.to_string(),
                        state: s.clone(),
                    });
                }
            };

            let forward = async {
                while let Some(event) = event_rx.recv().await {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            };
            let run = async {
                let result = graph.invoke_with_observer(state, Some(&mut observer)).await;
                drop(observer);
                result
            };
            let (result, _) = tokio::join!(run, forward);
            if let Err(e) = result {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
            }
        });

        ReceiverStream::new(rx)
    }
}
