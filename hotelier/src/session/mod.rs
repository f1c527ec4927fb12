//! Session adapter for chat front-ends.
//!
//! The front-end owns the conversation: every call to [`HotelFinderSession::predict`]
//! passes the new user message plus the prior turns, which are replayed verbatim
//! after the system instruction. Nothing is kept between calls.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::{AgentRunner, RunError, SYSTEM_PROMPT};
use crate::message::Message;
use crate::state::AgentState;

/// Speaker of a prior turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One prior turn as the front-end stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    fn to_message(&self) -> Message {
        match self.role {
            ChatRole::System => Message::system(self.content.clone()),
            ChatRole::User => Message::user(self.content.clone()),
            ChatRole::Assistant => Message::assistant(self.content.clone()),
        }
    }
}

/// Stateless hotel finder session.
pub struct HotelFinderSession {
    runner: AgentRunner,
    system_prompt: String,
}

impl HotelFinderSession {
    pub fn new(runner: AgentRunner) -> Self {
        Self {
            runner,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replaces the system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn runner(&self) -> &AgentRunner {
        &self.runner
    }

    /// System instruction, then `history` in order, then `message`.
    pub fn initial_state(&self, message: &str, history: &[ChatTurn]) -> AgentState {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(history.iter().map(ChatTurn::to_message));
        messages.push(Message::user(message));
        AgentState::new(messages)
    }

    /// Runs one turn and returns the content of the final message.
    pub async fn predict(&self, message: &str, history: &[ChatTurn]) -> Result<String, RunError> {
        self.predict_with_callback(message, history, |node_id, state| {
            debug!(
                node_id,
                messages = state.messages.len(),
                steps = state.number_of_steps,
                "turn progress"
            );
        })
        .await
    }

    /// Like [`predict`](Self::predict), calling `on_state(node_id, state)` after
    /// every reasoning and acting phase.
    pub async fn predict_with_callback<F>(
        &self,
        message: &str,
        history: &[ChatTurn],
        mut on_state: F,
    ) -> Result<String, RunError>
    where
        F: FnMut(&str, &AgentState) + Send,
    {
        info!(history = history.len(), "turn start");
        let state = self.initial_state(message, history);
        let final_state = self.runner.invoke_with_observer(state, &mut on_state).await?;
        info!(steps = final_state.number_of_steps, "turn complete");
        Ok(final_state.reply().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::agent::AgentOptions;
    use crate::llm::MockLlm;
    use crate::tools::ToolRegistry;

    fn session(reply: &str) -> (HotelFinderSession, Arc<MockLlm>) {
        let llm = Arc::new(MockLlm::with_no_tool_calls(reply));
        let runner = AgentRunner::new(
            llm.clone(),
            Box::new(ToolRegistry::new()),
            AgentOptions::default(),
        )
        .unwrap();
        (HotelFinderSession::new(runner), llm)
    }

    /// **Scenario**: History is replayed verbatim between the system instruction and the new message.
    #[test]
    fn initial_state_replays_history() {
        let (session, _) = session("ok");
        let history = vec![ChatTurn::user("Hola"), ChatTurn::assistant("¡Hola! ¿En qué puedo ayudarte?")];
        let state = session.initial_state("Hoteles en Atenas", &history);

        assert_eq!(state.number_of_steps, 0);
        assert_eq!(
            state.messages,
            vec![
                Message::system(SYSTEM_PROMPT),
                Message::user("Hola"),
                Message::assistant("¡Hola! ¿En qué puedo ayudarte?"),
                Message::user("Hoteles en Atenas"),
            ]
        );
    }

    /// **Scenario**: A plain answer ends the turn after one reasoning step.
    #[tokio::test]
    async fn predict_returns_final_message_content() {
        let (session, llm) = session("Hello! I find hotels.");
        let mut phases = Vec::new();
        let reply = session
            .predict_with_callback("hi", &[], |node_id, _| phases.push(node_id.to_string()))
            .await
            .unwrap();
        assert_eq!(reply, "Hello! I find hotels.");
        assert_eq!(phases, vec!["think"]);
        assert_eq!(llm.call_count(), 1);
    }

    /// **Scenario**: ChatTurn roles serialize in lowercase.
    #[test]
    fn chat_turn_serde_lowercase_role() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(turn, ChatTurn::assistant("hi"));
        assert_eq!(
            serde_json::to_value(ChatTurn::user("x")).unwrap()["role"],
            "user"
        );
    }

    /// **Scenario**: with_system_prompt replaces the first message.
    #[test]
    fn with_system_prompt_overrides_instruction() {
        let (session, _) = session("ok");
        let session = session.with_system_prompt("Be brief.");
        let state = session.initial_state("hi", &[]);
        assert_eq!(state.messages[0], Message::system("Be brief."));
    }
}
