use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::tool_source::{
    validate_arguments, ToolCallContent, ToolSource, ToolSourceError, ToolSpec,
};

use super::{Tool, ToolError};

/// Tools by name; the `ToolSource` the agent dispatches through.
///
/// Arguments are validated against the tool's schema before the call. Any
/// [`ToolError`] (including failed validation) becomes an error result; only an
/// unknown tool name is an `Err`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hotelier::provider::MockRateProvider;
/// use hotelier::tools::{AboutTool, CurrencyTool, ToolRegistry};
///
/// let mut registry = ToolRegistry::new();
/// registry.register(Box::new(AboutTool));
/// registry.register(Box::new(CurrencyTool::new(Arc::new(MockRateProvider::new()))));
/// let names: Vec<_> = registry.list().into_iter().map(|s| s.name).collect();
/// assert_eq!(names, vec!["about_you", "get_price_in_wanted_currency"]);
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool; replaces any tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Specs of all registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validates and runs one call.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        let spec = tool.spec();

        let result = match validate_arguments(&spec.input_schema, &args) {
            Ok(()) => tool.call(args).await,
            Err(reason) => Err(ToolError::InvalidInput(reason)),
        };

        Ok(match result {
            Ok(value) => {
                debug!(tool = name, "tool call succeeded");
                ToolCallContent {
                    value,
                    is_error: false,
                    return_direct: spec.return_direct,
                }
            }
            Err(e) => {
                warn!(tool = name, kind = e.kind(), error = %e, "tool call failed");
                ToolCallContent {
                    value: e.to_value(),
                    is_error: true,
                    return_direct: false,
                }
            }
        })
    }
}

#[async_trait]
impl ToolSource for ToolRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.list())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call(name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "failing".into(),
                description: None,
                input_schema: json!({
                    "type": "object",
                    "properties": {"n": {"type": "integer"}},
                    "required": ["n"]
                }),
                return_direct: true,
            }
        }

        async fn call(&self, _args: Value) -> Result<Value, ToolError> {
            Err(ToolError::NotFound {
                message: "nothing here",
            })
        }
    }

    /// **Scenario**: Unknown tool names are an error, not a result.
    #[tokio::test]
    async fn call_unknown_tool_returns_not_found() {
        let registry = ToolRegistry::new();
        let err = registry.call("book_flight", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(n) if n == "book_flight"));
    }

    /// **Scenario**: Schema violations become invalid_input results without calling the tool.
    #[tokio::test]
    async fn call_with_invalid_arguments_returns_error_result() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Failing));
        let content = registry.call("failing", json!({"n": "x"})).await.unwrap();
        assert!(content.is_error);
        assert_eq!(content.value["kind"], "invalid_input");
    }

    /// **Scenario**: A failing terminal tool does not end the loop.
    #[tokio::test]
    async fn failed_terminal_tool_is_not_return_direct() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Failing));
        let content = registry.call("failing", json!({"n": 1})).await.unwrap();
        assert!(content.is_error);
        assert!(!content.return_direct);
        assert_eq!(content.value, json!({"error": "nothing here", "kind": "not_found"}));
    }
}
