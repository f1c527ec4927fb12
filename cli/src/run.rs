//! One chat turn against a [`HotelFinderSession`], plus the history file the
//! front-end replays on every turn.

use std::path::{Path, PathBuf};

use hotelier::{BuildError, ChatTurn, ConfigError, HotelFinderSession};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("config file: {0}")]
    Load(#[from] hotelier_config::LoadError),
    #[error("build: {0}")]
    Build(#[from] BuildError),
    #[error("{0}")]
    Agent(#[from] hotelier::RunError),
    #[error("read history {}: {source}", path.display())]
    HistoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse history {}: {source}", path.display())]
    HistoryParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("output: {0}")]
    Output(String),
}

/// Reply of one turn and the nodes the agent loop went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutput {
    pub reply: String,
    /// Node ids in completion order, e.g. `["think", "act", "think"]`.
    pub nodes: Vec<String>,
    /// Reasoning steps taken.
    pub steps: u32,
}

/// Reads a JSON array of `{"role": "...", "content": "..."}` turns.
pub fn load_history(path: &Path) -> Result<Vec<ChatTurn>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::HistoryRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::HistoryParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs one turn; `history` is replayed as-is and not modified.
pub async fn run_turn(
    session: &HotelFinderSession,
    message: &str,
    history: &[ChatTurn],
) -> Result<TurnOutput, CliError> {
    let mut nodes = Vec::new();
    let mut steps = 0;
    let reply = session
        .predict_with_callback(message, history, |node_id, state| {
            debug!(node_id, steps = state.number_of_steps, "node finished");
            nodes.push(node_id.to_string());
            steps = state.number_of_steps;
        })
        .await?;
    Ok(TurnOutput {
        reply,
        nodes,
        steps,
    })
}

/// Appends the user message and the reply so the next turn replays them.
pub fn record_turn(history: &mut Vec<ChatTurn>, message: &str, reply: &str) {
    history.push(ChatTurn::user(message));
    history.push(ChatTurn::assistant(reply));
}

/// Plain reply text, or one JSON line with reply, nodes and steps.
pub fn render_turn(output: &TurnOutput, json: bool) -> Result<String, CliError> {
    if json {
        serde_json::to_string(output).map_err(|e| CliError::Output(e.to_string()))
    } else {
        Ok(output.reply.clone())
    }
}
