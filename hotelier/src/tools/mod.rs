//! Tools the reasoning model can call, the `Tool` trait and `ToolRegistry`.
//!
//! | Tool | Purpose |
//! |------|---------|
//! | `get_iata_of_city` | city + country → IATA city code records |
//! | `get_best_offer` | cheapest hotel offer for a city, party size and dates |
//! | `get_price_in_wanted_currency` | convert a price between currencies |
//! | `about_you` | what the assistant can do (terminal) |
//!
//! Every tool returns a JSON mapping. Failures are typed [`ToolError`]s that the
//! registry turns into `{"error": ..., "kind": ...}` results for the model.

mod about;
mod currency;
mod error;
mod hotel_offer;
mod location;
mod registry;
mod r#trait;

pub use about::{AboutTool, AGENT_SERVICES_INFO, TOOL_ABOUT_YOU};
pub use currency::{format_price, CurrencyTool, TOOL_GET_PRICE_IN_WANTED_CURRENCY};
pub use error::{ToolError, CITY_NOT_FOUND, NO_OFFERS_FOUND, PRICE_NOT_ESTIMATED};
pub use hotel_offer::{
    select_best_offer, BestOffer, HotelOfferTool, OfferPick, OfferSelection, MAX_BATCH_ATTEMPTS,
    OFFER_BATCH_SIZE, TOOL_GET_BEST_OFFER,
};
pub use location::{resolve_locations, LocationTool, TOOL_GET_IATA_OF_CITY};
pub use r#trait::Tool;
pub use registry::ToolRegistry;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserializes tool arguments into a typed struct.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidInput(e.to_string()))
}
