//! Tool source abstraction: list tools and call a tool by name.
//!
//! The agent depends on `ToolSource` rather than on concrete tools. `ToolRegistry`
//! (in `crate::tools`) is the production implementation; tests can plug in any
//! other source.
//!
//! A call that reaches a registered tool always yields a [`ToolCallContent`], also
//! when the tool failed: the failure is part of the content (`is_error`) so the
//! reasoning model can read it. Only an unregistered name is an `Err`.

mod validate;

pub use validate::validate_arguments;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification: what the reasoning model sees for one tool.
///
/// **Interaction**: Returned by `ToolSource::list_tools()`; passed to `ChatOpenAI`
/// and printed by the CLI `tool show` command.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema object for the arguments.
    pub input_schema: Value,
    /// Terminal tool: once it has run, its result is the final answer and the
    /// loop ends without another reasoning step.
    #[serde(default)]
    pub return_direct: bool,
}

/// Outcome of a single tool call, success or error mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallContent {
    /// The result mapping (`{"error": ...}` when `is_error`).
    pub value: Value,
    pub is_error: bool,
    /// Copied from the tool's spec so the dispatcher can stop the loop.
    pub return_direct: bool,
}

impl ToolCallContent {
    /// JSON text of the result, as stored in the tool message.
    pub fn text(&self) -> String {
        self.value.to_string()
    }
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// No tool with that name is registered.
    #[error("tool not found: {0}")]
    NotFound(String),
}

/// Source of callable tools.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Specs of all tools, in a stable order.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Calls the named tool with a JSON argument object.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
