//! `run_turn` against a session built from a scripted model and in-memory providers.

use std::sync::Arc;

use hotelier::provider::CityLocation;
use hotelier::{
    build_session_with, ChatTurn, HotelFinderSession, HotelierConfig, LlmResponse, MockLlm,
    MockRateProvider, MockTravelProvider, ToolCall,
};
use hotelier_cli::{record_turn, run_turn};
use serde_json::json;

fn session(llm: Arc<MockLlm>) -> HotelFinderSession {
    let config = HotelierConfig::from_lookup(|key| match key {
        "GEMINI_API_KEY" | "AMADEUS_CLIENT_ID" | "AMADEUS_CLIENT_SECRET" | "EXCHANGE_API_KEY" => {
            Some("test".to_string())
        }
        _ => None,
    })
    .unwrap();
    let athens: CityLocation = serde_json::from_value(json!({
        "name": "ATHENS",
        "iataCode": "ATH",
        "address": {"cityName": "ATHENS", "countryCode": "GR"},
        "geoCode": {"latitude": 37.9, "longitude": 23.7}
    }))
    .unwrap();
    build_session_with(
        llm,
        Arc::new(MockTravelProvider::new().with_cities(vec![athens])),
        Arc::new(MockRateProvider::new()),
        &config,
    )
    .unwrap()
}

#[tokio::test]
async fn run_turn_reports_nodes_and_steps() {
    let llm = Arc::new(MockLlm::scripted(vec![
        LlmResponse::tool_calls(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "get_iata_of_city".into(),
                arguments: json!({"city": "Athens", "country": "GR"}).to_string(),
            }],
        ),
        LlmResponse::text("Athens has IATA code ATH."),
    ]));
    let session = session(Arc::clone(&llm));

    let output = run_turn(&session, "What is the IATA code of Athens?", &[])
        .await
        .unwrap();
    assert_eq!(output.reply, "Athens has IATA code ATH.");
    assert_eq!(output.nodes, vec!["think", "act", "think"]);
    assert_eq!(output.steps, 2);
}

/// **Scenario**: the REPL's recorded history is replayed on the next turn.
#[tokio::test]
async fn recorded_history_is_replayed_next_turn() {
    let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::text("Καλημέρα!")]));
    let session = session(Arc::clone(&llm));
    let mut history: Vec<ChatTurn> = Vec::new();

    let first = run_turn(&session, "Γειά σου", &history).await.unwrap();
    record_turn(&mut history, "Γειά σου", &first.reply);
    run_turn(&session, "Ξενοδοχεία στην Αθήνα", &history).await.unwrap();

    let prompts = llm.prompts().await;
    assert_eq!(prompts.len(), 2);
    let contents: Vec<&str> = prompts[1].iter().map(|m| m.content()).collect();
    assert_eq!(&contents[1..], &["Γειά σου", "Καλημέρα!", "Ξενοδοχεία στην Αθήνα"]);
}
