//! Scripted LLM for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

/// Mock LLM replaying a fixed list of responses.
///
/// The n-th `invoke()` returns the n-th scripted response; once the script is
/// exhausted the last response repeats. Every prompt it receives is recorded so
/// tests can assert on what the model saw.
pub struct MockLlm {
    script: Vec<LlmResponse>,
    call_count: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Creates a mock answering with `responses` in order.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: responses,
            call_count: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that always answers with plain text and no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![LlmResponse::text(content)])
    }

    /// Number of `invoke()` calls so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The message lists passed to each `invoke()`, in call order.
    pub async fn prompts(&self) -> Vec<Vec<Message>> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().await.push(messages.to_vec());
        self.script
            .get(n)
            .or_else(|| self.script.last())
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed("mock LLM has no scripted response".into()))
    }
}
