//! # Hotelier
//!
//! A conversational hotel finder: a language model reasons over the conversation,
//! calls travel tools (city → IATA code, best hotel offer, currency conversion,
//! self-description) and answers in the user's language.
//!
//! The design is state-in, state-out: every step of the agent loop is a graph node
//! that receives an [`AgentState`] and returns the updated state plus a [`Next`]
//! routing decision.
//!
//! ## Main modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`, conditional edges.
//! - [`agent`]: `ThinkNode` (reasoning), `ActNode` (acting), `tools_condition`, `AgentRunner`.
//! - [`session`]: `HotelFinderSession::predict(message, history)` for stateless chat front-ends.
//! - [`tools`]: the four travel tools, the `Tool` trait and `ToolRegistry`.
//! - [`tool_source`]: `ToolSpec`, `ToolSource`, argument validation.
//! - [`provider`]: travel data and exchange-rate clients behind traits.
//! - [`llm`]: `LlmClient`, `ChatOpenAI`, `MockLlm`.
//! - [`config`]: `HotelierConfig::from_env()`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hotelier::{build_session, HotelierConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HotelierConfig::from_env()?;
//! let session = build_session(&config).await?;
//! let reply = session.predict("Hotels in Athens, GR for 2 people, 2025-07-01 to 2025-07-05", &[]).await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod build;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod provider;
pub mod session;
pub mod state;
pub mod stream;
pub mod tool_source;
pub mod tools;

pub use agent::{
    tools_condition, ActNode, AgentOptions, AgentRunner, RunError, ThinkNode,
    ToolsConditionResult, STEP_CAP_REPLY, SYSTEM_PROMPT,
};
pub use build::{build_session, build_session_with, build_tool_registry, tool_specs, BuildError};
pub use config::{ConfigError, HotelierConfig};
pub use error::AgentError;
pub use graph::{CompilationError, CompiledStateGraph, Next, Node, StateGraph, END, START};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use message::Message;
pub use provider::{
    AmadeusClient, ExchangeRateClient, MockRateProvider, MockTravelProvider, ProviderError,
    RateProvider, TravelProvider,
};
pub use session::{ChatRole, ChatTurn, HotelFinderSession};
pub use state::{AgentState, ToolCall, ToolResult};
pub use stream::StreamEvent;
pub use tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{Tool, ToolError, ToolRegistry};
