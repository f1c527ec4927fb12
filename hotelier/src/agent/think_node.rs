//! Think node: read messages, call the LLM, append the assistant message.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{AgentState, ToolCall};

use super::prompt::STEP_CAP_REPLY;

pub struct ThinkNode {
    llm: Arc<dyn LlmClient>,
    max_steps: u32,
}

impl ThinkNode {
    pub fn new(llm: Arc<dyn LlmClient>, max_steps: u32) -> Self {
        Self { llm, max_steps }
    }
}

/// Gives every call a non-empty id so tool messages can be matched to it.
fn assign_call_ids(tool_calls: Vec<ToolCall>) -> Vec<ToolCall> {
    tool_calls
        .into_iter()
        .map(|mut tc| {
            if tc.id.trim().is_empty() {
                tc.id = format!("call-{}", uuid::Uuid::new_v4());
            }
            tc
        })
        .collect()
}

#[async_trait]
impl Node<AgentState> for ThinkNode {
    fn id(&self) -> &str {
        "think"
    }

    async fn run(&self, mut state: AgentState) -> Result<(AgentState, Next), AgentError> {
        if state.number_of_steps >= self.max_steps {
            warn!(
                steps = state.number_of_steps,
                max_steps = self.max_steps,
                "reasoning step cap reached, answering with best effort"
            );
            let reply = state
                .last_assistant_reply()
                .unwrap_or(STEP_CAP_REPLY)
                .to_string();
            state.messages.push(Message::assistant(reply));
            return Ok((state, Next::Continue));
        }

        let response = self.llm.invoke(&state.messages).await?;
        let tool_calls = assign_call_ids(response.tool_calls);
        debug!(
            step = state.number_of_steps + 1,
            tool_calls = tool_calls.len(),
            content_len = response.content.len(),
            "reasoning step"
        );
        state
            .messages
            .push(Message::assistant_with_tool_calls(response.content, tool_calls));
        state.number_of_steps += 1;
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, MockLlm};

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "about_you".into(),
            arguments: "{}".into(),
        }
    }

    /// **Scenario**: The assistant message is appended and the step counter advances.
    #[tokio::test]
    async fn run_appends_assistant_message_and_counts_step() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("Hello!"));
        let node = ThinkNode::new(llm.clone(), 10);
        let state = AgentState::new(vec![Message::user("hi")]);

        let (out, next) = node.run(state).await.unwrap();
        assert!(matches!(next, Next::Continue));
        assert_eq!(out.number_of_steps, 1);
        assert_eq!(out.messages.last(), Some(&Message::assistant("Hello!")));
        assert_eq!(llm.call_count(), 1);
    }

    /// **Scenario**: Calls without an id get a generated unique id; given ids are kept.
    #[tokio::test]
    async fn run_fills_missing_call_ids() {
        let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::tool_calls(
            "",
            vec![call(""), call("  "), call("keep-me")],
        )]));
        let node = ThinkNode::new(llm, 10);
        let (out, _) = node.run(AgentState::new(vec![Message::user("hi")])).await.unwrap();

        let ids: Vec<&str> = out.pending_tool_calls().iter().map(|c| c.id.as_str()).collect();
        assert!(ids[0].starts_with("call-"));
        assert!(ids[1].starts_with("call-"));
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[2], "keep-me");
    }

    /// **Scenario**: At the cap the model is not called and the latest assistant text is reused.
    #[tokio::test]
    async fn run_at_cap_reuses_latest_reply_without_calling_model() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("unused"));
        let node = ThinkNode::new(llm.clone(), 2);
        let mut state = AgentState::new(vec![
            Message::user("hotels in Athens"),
            Message::assistant_with_tool_calls("Looking up Athens.", vec![call("c1")]),
        ]);
        state.number_of_steps = 2;

        let (out, _) = node.run(state).await.unwrap();
        assert_eq!(llm.call_count(), 0);
        assert_eq!(out.messages.last(), Some(&Message::assistant("Looking up Athens.")));
        assert!(out.pending_tool_calls().is_empty());
    }

    /// **Scenario**: At the cap with no assistant text the fixed apology is used.
    #[tokio::test]
    async fn run_at_cap_without_text_uses_apology() {
        let node = ThinkNode::new(Arc::new(MockLlm::with_no_tool_calls("unused")), 0);
        let (out, _) = node.run(AgentState::new(vec![Message::user("hi")])).await.unwrap();
        assert_eq!(out.last_content(), Some(STEP_CAP_REPLY));
    }

    /// **Scenario**: A failing model call surfaces as an AgentError.
    #[tokio::test]
    async fn run_propagates_llm_failure() {
        let node = ThinkNode::new(Arc::new(MockLlm::scripted(vec![])), 10);
        let err = node.run(AgentState::new(vec![])).await.unwrap_err();
        assert!(matches!(err, AgentError::ExecutionFailed(_)));
    }
}
