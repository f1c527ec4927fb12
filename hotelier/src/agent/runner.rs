//! Agent graph runner: builds the think/act graph and runs it on a state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, StateObserver, END, START};
use crate::llm::LlmClient;
use crate::state::AgentState;
use crate::stream::{StreamEvent, StreamMode};
use crate::tool_source::ToolSource;

use super::act_node::ActNode;
use super::think_node::ThinkNode;
use super::tools_condition;

/// Reasoning steps allowed per turn before the loop is forced to answer.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Loop options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentOptions {
    /// Reasoning-step cap per turn.
    pub max_steps: u32,
    /// Dispatch the tool calls of one step concurrently.
    pub parallel_tool_calls: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            parallel_tool_calls: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("run failed: {0}")]
    Stream(String),
    #[error("stream ended without final state")]
    StreamEndedWithoutState,
}

pub struct AgentRunner {
    compiled: CompiledStateGraph<AgentState>,
}

impl AgentRunner {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tool_source: Box<dyn ToolSource>,
        options: AgentOptions,
    ) -> Result<Self, CompilationError> {
        let think = ThinkNode::new(llm, options.max_steps);
        let act = ActNode::new(tool_source).with_parallel_tool_calls(options.parallel_tool_calls);

        let think_condition_path_map: HashMap<String, String> =
            [("tools".into(), "act".into()), (END.into(), END.into())]
                .into_iter()
                .collect();

        let mut graph = StateGraph::<AgentState>::new();
        graph
            .add_node("think", Arc::new(think))
            .add_node("act", Arc::new(act))
            .add_edge(START, "think")
            .add_conditional_edges(
                "think",
                Arc::new(|state: &AgentState| tools_condition(state).as_str().to_string()),
                Some(think_condition_path_map),
            )
            .add_edge("act", "think");

        Ok(Self {
            compiled: graph.compile()?,
        })
    }

    /// Runs the loop to its terminal state.
    pub async fn invoke(&self, state: AgentState) -> Result<AgentState, RunError> {
        Ok(self.compiled.invoke(state).await?)
    }

    /// Like `invoke`, calling `observer(node_id, state)` after every phase.
    pub async fn invoke_with_observer(
        &self,
        state: AgentState,
        observer: StateObserver<'_, AgentState>,
    ) -> Result<AgentState, RunError> {
        Ok(self
            .compiled
            .invoke_with_observer(state, Some(observer))
            .await?)
    }

    /// Streams every intermediate state (`Updates` and `Values`).
    pub fn stream(&self, state: AgentState) -> ReceiverStream<StreamEvent<AgentState>> {
        self.compiled.stream(state, StreamMode::all())
    }

    /// Consumes the stream, passing each event to `on_event`, and returns the
    /// state of the last `Values` event.
    pub async fn stream_with_callback<F>(
        &self,
        state: AgentState,
        mut on_event: Option<F>,
    ) -> Result<AgentState, RunError>
    where
        F: FnMut(&StreamEvent<AgentState>),
    {
        let mut stream = self.stream(state);
        let mut final_state = None;
        while let Some(event) = stream.next().await {
            if let Some(ref mut f) = on_event {
                f(&event);
            }
            match event {
                StreamEvent::Values(s) => final_state = Some(s),
                StreamEvent::Error(e) => return Err(RunError::Stream(e)),
                StreamEvent::Updates { .. } => {}
            }
        }
        final_state.ok_or(RunError::StreamEndedWithoutState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, MockLlm};
    use crate::message::Message;
    use crate::state::ToolCall;
    use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
    use crate::tools::{AboutTool, ToolRegistry};

    fn registry() -> Box<dyn ToolSource> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AboutTool));
        Box::new(registry)
    }

    /// Accepts every call so the loop can keep going.
    struct Accepting;

    #[async_trait::async_trait]
    impl ToolSource for Accepting {
        async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
            Ok(vec![])
        }

        async fn call_tool(
            &self,
            _name: &str,
            _arguments: serde_json::Value,
        ) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent {
                value: serde_json::json!({}),
                is_error: false,
                return_direct: false,
            })
        }
    }

    fn about_call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "about_you".into(),
            arguments: "{}".into(),
        }
    }

    /// **Scenario**: The step cap stops a model that keeps requesting tools.
    #[tokio::test]
    async fn invoke_stops_at_step_cap() {
        let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::tool_calls(
            "Still looking.",
            vec![ToolCall {
                id: String::new(),
                name: "get_best_offer".into(),
                arguments: "{}".into(),
            }],
        )]));
        let runner = AgentRunner::new(
            llm.clone(),
            Box::new(Accepting),
            AgentOptions {
                max_steps: 3,
                parallel_tool_calls: false,
            },
        )
        .unwrap();
        let out = runner
            .invoke(AgentState::new(vec![Message::user("hotels?")]))
            .await
            .unwrap();
        assert_eq!(llm.call_count(), 3);
        assert_eq!(out.number_of_steps, 3);
        assert_eq!(out.messages.last(), Some(&Message::assistant("Still looking.")));
    }

    /// **Scenario**: stream_with_callback sees think then act, then returns the final state.
    #[tokio::test]
    async fn stream_with_callback_reports_phases() {
        let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::tool_calls(
            "",
            vec![about_call("c1")],
        )]));
        let runner = AgentRunner::new(llm, registry(), AgentOptions::default()).unwrap();
        let mut nodes = Vec::new();
        let out = runner
            .stream_with_callback(
                AgentState::new(vec![Message::user("what can you do?")]),
                Some(|event: &StreamEvent<AgentState>| {
                    if let StreamEvent::Updates { node_id, .. } = event {
                        nodes.push(node_id.clone());
                    }
                }),
            )
            .await
            .unwrap();
        assert_eq!(nodes, vec!["think", "act"]);
        assert!(out.last_content().unwrap().contains("agent_services_info"));
    }

    /// **Scenario**: A fatal error inside the loop surfaces from the stream.
    #[tokio::test]
    async fn stream_with_callback_surfaces_errors() {
        let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::tool_calls(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "book_flight".into(),
                arguments: "{}".into(),
            }],
        )]));
        let runner = AgentRunner::new(llm, registry(), AgentOptions::default()).unwrap();
        let err = runner
            .stream_with_callback(
                AgentState::new(vec![Message::user("book me a flight")]),
                None::<fn(&StreamEvent<AgentState>)>,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("book_flight"));
    }
}
