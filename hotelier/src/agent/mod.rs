//! The hotel finder agent loop: Reasoning (`think`) and Acting (`act`) alternate
//! until the model answers without tool calls or a terminal tool has run.
//!
//! ```text
//! START → think ──(tool calls)──→ act ──→ think
//!            └──(no tool calls)──→ END     └──(terminal tool)──→ END
//! ```

mod act_node;
mod prompt;
mod runner;
mod think_node;

pub use act_node::ActNode;
pub use prompt::{STEP_CAP_REPLY, SYSTEM_PROMPT};
pub use runner::{AgentOptions, AgentRunner, RunError, DEFAULT_MAX_STEPS};
pub use think_node::ThinkNode;

use crate::graph::END;
use crate::state::AgentState;

/// Routing decision after a reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsConditionResult {
    /// The last assistant message requested tools; run the acting phase.
    Tools,
    /// The model answered; the turn is over.
    End,
}

impl ToolsConditionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => END,
        }
    }
}

/// Routes to the acting phase when the last message carries tool calls.
pub fn tools_condition(state: &AgentState) -> ToolsConditionResult {
    if state.pending_tool_calls().is_empty() {
        ToolsConditionResult::End
    } else {
        ToolsConditionResult::Tools
    }
}
