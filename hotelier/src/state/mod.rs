//! Agent state: the message history of one user turn plus the reasoning step counter.
//!
//! Nodes receive the whole state and return the whole state. The message list is
//! append-only: each tool message follows the assistant message whose call it
//! answers, and precedes the next reasoning step.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A tool invocation requested by the model.
///
/// `arguments` is the raw JSON text emitted by the model; `id` is unique within the
/// turn and is echoed by the matching [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Result of executing one tool call.
///
/// `content` is the JSON text of the tool's result mapping (success or
/// `{"error": ...}`); `is_error` marks the latter. `return_direct` marks a terminal
/// tool whose content is the turn's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub return_direct: bool,
}

/// State of one agent run (one user turn).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Conversation so far: system instruction, replayed history, new user message,
    /// then everything the loop appends.
    pub messages: Vec<Message>,
    /// Number of reasoning steps taken in this turn.
    pub number_of_steps: u32,
}

impl AgentState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            number_of_steps: 0,
        }
    }

    /// Tool calls still waiting for results: those of the last message when it is an
    /// assistant message. Empty once the acting phase has appended the tool messages.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.messages
            .last()
            .map(Message::tool_calls)
            .unwrap_or(&[])
    }

    /// Content of the last message, if any.
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(Message::content)
    }

    /// Reply of a finished turn: the first terminal tool result of the trailing tool
    /// messages (request order), otherwise the content of the last message.
    pub fn reply(&self) -> Option<&str> {
        let trailing = self
            .messages
            .iter()
            .rev()
            .take_while(|m| matches!(m, Message::Tool(_)))
            .count();
        self.messages[self.messages.len() - trailing..]
            .iter()
            .find_map(|m| match m {
                Message::Tool(result) if result.return_direct => Some(result.content.as_str()),
                _ => None,
            })
            .or_else(|| self.last_content())
    }

    /// Latest non-empty assistant text of the current turn, i.e. after the last user
    /// message. Replayed history never counts.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .take_while(|m| !m.is_user())
            .filter(|m| m.is_assistant())
            .map(Message::content)
            .find(|c| !c.trim().is_empty())
    }
}
