use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::ToolSpec;

use super::ToolError;

/// A single tool the model can call.
///
/// Each tool has a unique name, a [`ToolSpec`] (description, JSON Schema, terminal
/// flag) and the call logic. Tools are registered with `ToolRegistry`, which
/// validates arguments against the schema before calling.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
/// use hotelier::tools::{Tool, ToolError};
/// use hotelier::tool_source::ToolSpec;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: Some("Echoes its arguments".to_string()),
///             input_schema: json!({"type": "object"}),
///             return_direct: false,
///         }
///     }
///
///     async fn call(&self, args: Value) -> Result<Value, ToolError> {
///         Ok(json!({ "echo": args }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; what the model uses to request the tool.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    /// Runs the tool with already schema-checked arguments.
    async fn call(&self, args: Value) -> Result<Value, ToolError>;
}
