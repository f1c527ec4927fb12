//! Agent execution error types.
//!
//! Returned by graph nodes and the compiled graph when a step cannot complete.
//! Tool-level failures are not errors here: they become tool results the model can
//! read. Only faults that make the turn meaningless end up in `AgentError`.

use thiserror::Error;

/// Agent execution error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. reasoning model call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The model requested a tool that is not registered. This is a configuration
    /// fault, not something the model can recover from.
    #[error("tool not registered: {0}")]
    ToolNotRegistered(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of ExecutionFailed contains "execution failed" and the message.
    #[test]
    fn agent_error_display_execution_failed() {
        let err = AgentError::ExecutionFailed("msg".to_string());
        let s = err.to_string();
        assert!(s.contains("execution failed"), "{}", s);
        assert!(s.contains("msg"), "{}", s);
    }

    /// **Scenario**: ToolNotRegistered names the offending tool.
    #[test]
    fn agent_error_display_tool_not_registered() {
        let err = AgentError::ToolNotRegistered("book_flight".to_string());
        assert_eq!(err.to_string(), "tool not registered: book_flight");
    }
}
