//! Act node: dispatch the pending tool calls, append one tool message per call.
//!
//! Every call is dispatched, in request order, even when earlier ones failed:
//! a tool failure is a result the model reads on its next step. The only fatal
//! outcome is a call to a tool that is not registered.
//!
//! With concurrent dispatch enabled the calls of one step run together, but
//! their tool messages are still appended in request order.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::{AgentState, ToolCall, ToolResult};
use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Parses ToolCall.arguments string to JSON Value. Logs a warning on parse failure
/// and falls back to an empty object, which the schema check then reports to the model.
fn parse_tool_arguments(arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
                serde_json::json!({})
            }
        }
    };
    // Some models double-encode the argument object as a JSON string.
    if let Some(s) = raw.as_str() {
        serde_json::from_str(s).unwrap_or_else(|e| {
            warn!(error = %e, "nested tool arguments JSON parse failed");
            raw
        })
    } else {
        raw
    }
}

fn to_agent_error(error: ToolSourceError) -> AgentError {
    match error {
        ToolSourceError::NotFound(name) => AgentError::ToolNotRegistered(name),
    }
}

/// Act node: executes the tool calls of the last assistant message.
pub struct ActNode {
    tools: Box<dyn ToolSource>,
    parallel: bool,
}

impl ActNode {
    pub fn new(tools: Box<dyn ToolSource>) -> Self {
        Self {
            tools,
            parallel: false,
        }
    }

    /// Dispatch the calls of one step concurrently.
    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    async fn dispatch(&self, tc: &ToolCall) -> Result<ToolCallContent, AgentError> {
        let args = parse_tool_arguments(&tc.arguments);
        debug!(tool = %tc.name, call_id = %tc.id, "dispatching tool call");
        trace!(tool = %tc.name, args = %truncate_for_log(&args.to_string(), 500), "tool arguments");
        let content = self
            .tools
            .call_tool(&tc.name, args)
            .await
            .map_err(to_agent_error)?;
        trace!(
            tool = %tc.name,
            is_error = content.is_error,
            result = %truncate_for_log(&content.text(), 500),
            "tool result"
        );
        Ok(content)
    }
}

#[async_trait]
impl Node<AgentState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, mut state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let calls: Vec<ToolCall> = state.pending_tool_calls().to_vec();

        let outcomes: Vec<ToolCallContent> = if self.parallel && calls.len() > 1 {
            join_all(calls.iter().map(|tc| self.dispatch(tc)))
                .await
                .into_iter()
                .collect::<Result<_, _>>()?
        } else {
            let mut outcomes = Vec::with_capacity(calls.len());
            for tc in &calls {
                outcomes.push(self.dispatch(tc).await?);
            }
            outcomes
        };

        let terminal = outcomes.iter().any(|c| c.return_direct);
        for (tc, content) in calls.into_iter().zip(outcomes) {
            state.messages.push(Message::tool(ToolResult {
                call_id: tc.id,
                name: tc.name,
                content: content.text(),
                is_error: content.is_error,
                return_direct: content.return_direct,
            }));
        }

        if terminal {
            debug!("terminal tool ran, ending turn");
            Ok((state, Next::End))
        } else {
            Ok((state, Next::Continue))
        }
    }
}
