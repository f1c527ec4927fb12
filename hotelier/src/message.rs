//! Message types for agent state.
//!
//! Roles: System (first in the list), User, Assistant (optionally carrying tool
//! calls) and Tool (the result of one tool call, linked to it by call id).
//! Used by `AgentState::messages`; the reasoning model sees the full list.

use serde::{Deserialize, Serialize};

use crate::state::{ToolCall, ToolResult};

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// System instruction; placed first in the message list.
    System { content: String },
    /// User input.
    User { content: String },
    /// Model reply. Non-empty `tool_calls` means the model requested actions.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// Outcome of one tool call.
    Tool(ToolResult),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Creates an assistant message without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Creates an assistant message that requests the given tool calls.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a tool message from a tool result.
    pub fn tool(result: ToolResult) -> Self {
        Self::Tool(result)
    }

    /// Text content of the message. For tool messages, the serialized result.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::User { content } => content,
            Self::Assistant { content, .. } => content,
            Self::Tool(result) => &result.content,
        }
    }

    /// Tool calls requested by this message; empty unless it is an assistant message.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Self::Assistant { .. })
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}
