//! Wiring: providers, tool registry, reasoning model, runner and session from a
//! [`HotelierConfig`].

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use thiserror::Error;
use tracing::info;

use crate::agent::AgentRunner;
use crate::config::HotelierConfig;
use crate::graph::CompilationError;
use crate::llm::{ChatOpenAI, LlmClient};
use crate::provider::{
    AmadeusClient, ExchangeRateClient, MockRateProvider, MockTravelProvider, ProviderError,
    RateProvider, TravelProvider,
};
use crate::session::HotelFinderSession;
use crate::tool_source::ToolSpec;
use crate::tools::{AboutTool, CurrencyTool, HotelOfferTool, LocationTool, ToolRegistry};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
}

/// Registry with the four hotel finder tools.
pub fn build_tool_registry(
    travel: Arc<dyn TravelProvider>,
    rates: Arc<dyn RateProvider>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(LocationTool::new(Arc::clone(&travel))));
    registry.register(Box::new(HotelOfferTool::new(travel)));
    registry.register(Box::new(CurrencyTool::new(rates)));
    registry.register(Box::new(AboutTool));
    registry
}

/// Specs of the hotel finder tools, without credentials or network access.
///
/// Used by `hotelier tool list` / `tool show`; the providers behind these tools are never called.
pub fn tool_specs() -> Vec<ToolSpec> {
    build_tool_registry(
        Arc::new(MockTravelProvider::new()),
        Arc::new(MockRateProvider::new()),
    )
    .list()
}

fn build_llm(config: &HotelierConfig, registry: &ToolRegistry) -> ChatOpenAI {
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.model.api_key.clone())
        .with_api_base(config.model.base_url.trim_end_matches('/'));
    let llm = ChatOpenAI::with_config(openai_config, config.model.model.clone())
        .with_tools(registry.list())
        .with_temperature(config.model.temperature)
        .with_max_retries(config.model.max_retries);
    let llm = match config.model.tool_choice {
        Some(mode) => llm.with_tool_choice(mode),
        None => llm,
    };
    match config.model.timeout {
        Some(timeout) => llm.with_timeout(timeout),
        None => llm,
    }
}

/// Session over `llm` and the given providers.
pub fn build_session_with(
    llm: Arc<dyn LlmClient>,
    travel: Arc<dyn TravelProvider>,
    rates: Arc<dyn RateProvider>,
    config: &HotelierConfig,
) -> Result<HotelFinderSession, BuildError> {
    let registry = build_tool_registry(travel, rates);
    let runner = AgentRunner::new(llm, Box::new(registry), config.agent)?;
    Ok(HotelFinderSession::new(runner))
}

/// Builds the production session: Amadeus, exchangerate-api and the configured model.
pub async fn build_session(config: &HotelierConfig) -> Result<HotelFinderSession, BuildError> {
    let travel: Arc<dyn TravelProvider> = Arc::new(
        AmadeusClient::new(
            config.amadeus.client_id.clone(),
            config.amadeus.client_secret.clone(),
        )
        .with_base_url(config.amadeus.base_url.clone())
        .with_timeout(config.http_timeout)?,
    );
    let rates: Arc<dyn RateProvider> = Arc::new(
        ExchangeRateClient::new(config.exchange.api_key.clone())
            .with_base_url(config.exchange.base_url.clone())
            .with_timeout(config.http_timeout)?,
    );

    let registry = build_tool_registry(Arc::clone(&travel), Arc::clone(&rates));
    let llm: Arc<dyn LlmClient> = Arc::new(build_llm(config, &registry));
    info!(
        model = %config.model.model,
        tools = registry.len(),
        max_steps = config.agent.max_steps,
        "hotel finder session ready"
    );
    let runner = AgentRunner::new(llm, Box::new(registry), config.agent)?;
    Ok(HotelFinderSession::new(runner))
}
