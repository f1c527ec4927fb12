//! `about_you`: describes what the assistant can do. Terminal tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool_source::ToolSpec;

use super::{Tool, ToolError};

pub const TOOL_ABOUT_YOU: &str = "about_you";

pub const AGENT_SERVICES_INFO: &str = "You can search for the best hotel offers for the city you want based on your travel criteria. You can also get the offer at the currency you prefer. ";

/// Self-description tool. Its result is the final answer of the turn.
pub struct AboutTool;

#[async_trait]
impl Tool for AboutTool {
    fn name(&self) -> &str {
        TOOL_ABOUT_YOU
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_ABOUT_YOU.to_string(),
            description: Some(
                "Describe the services this assistant offers. Use when the user asks who you are or what you can do."
                    .to_string(),
            ),
            input_schema: json!({"type": "object", "properties": {}}),
            return_direct: true,
        }
    }

    async fn call(&self, _args: Value) -> Result<Value, ToolError> {
        Ok(json!({ "agent_services_info": AGENT_SERVICES_INFO }))
    }
}
