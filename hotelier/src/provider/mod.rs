//! External data providers: travel data (cities, hotels, offers) and exchange rates.
//!
//! Tools depend on the [`TravelProvider`] and [`RateProvider`] traits and receive
//! them as explicit `Arc` dependencies. Production clients are [`AmadeusClient`]
//! and [`ExchangeRateClient`]; [`MockTravelProvider`] and [`MockRateProvider`] are
//! scripted in-memory stand-ins for tests and offline demos.

mod amadeus;
mod exchange_rate;
mod mock;

pub use amadeus::{AmadeusClient, DEFAULT_AMADEUS_BASE_URL};
pub use exchange_rate::{ExchangeRateClient, DEFAULT_EXCHANGE_BASE_URL};
pub use mock::{MockRateProvider, MockTravelProvider};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure talking to a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, timeout or other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Credentials rejected or token exchange failed.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
    /// The provider answered with an explicit error payload.
    #[error("provider error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// One city record from the city search.
///
/// `address` and `geo_code` are kept as open maps so every field the provider
/// returns ends up in the tool output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityLocation {
    pub name: String,
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub address: Map<String, Value>,
    #[serde(default)]
    pub geo_code: Map<String, Value>,
}

impl CityLocation {
    /// ISO-2 country code from the address, when present.
    pub fn country_code(&self) -> Option<&str> {
        self.address.get("countryCode").and_then(Value::as_str)
    }
}

/// Hotel listed for a city; only the id is needed for the offer search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRef {
    pub hotel_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Offers of one hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffers {
    pub hotel: HotelInfo,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfo {
    #[serde(default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: OfferPrice,
    #[serde(default)]
    pub room: Option<Room>,
}

/// Price of an offer. `total` is kept as the provider's decimal string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferPrice {
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub description: Option<RoomDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDescription {
    #[serde(default)]
    pub text: Option<String>,
}

impl HotelOffers {
    /// A hotel with a single offer.
    pub fn single(
        hotel_name: impl Into<String>,
        total: impl Into<String>,
        currency: impl Into<String>,
        room_description: impl Into<String>,
    ) -> Self {
        Self {
            hotel: HotelInfo {
                hotel_id: None,
                name: Some(hotel_name.into()),
            },
            offers: vec![Offer {
                price: OfferPrice {
                    total: Some(total.into()),
                    currency: Some(currency.into()),
                },
                room: Some(Room {
                    description: Some(RoomDescription {
                        text: Some(room_description.into()),
                    }),
                }),
            }],
        }
    }
}

/// Parameters of one offer search request (one batch of hotel ids).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferQuery {
    pub hotel_ids: Vec<String>,
    pub adults: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Latest conversion rates for one base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub conversion_rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.conversion_rates.get(currency).copied()
    }
}

/// Travel data provider: city lookup, hotel listing, offer search.
#[async_trait]
pub trait TravelProvider: Send + Sync {
    /// Cities matching a keyword (English city name).
    async fn search_cities(&self, keyword: &str) -> Result<Vec<CityLocation>, ProviderError>;

    /// All hotels of a city, by IATA city code.
    async fn list_hotels_by_city(&self, city_code: &str) -> Result<Vec<HotelRef>, ProviderError>;

    /// Offers for a batch of hotel ids. An empty list means nothing is available.
    async fn search_hotel_offers(&self, query: &OfferQuery)
        -> Result<Vec<HotelOffers>, ProviderError>;
}

/// Exchange-rate provider.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest rates from `base` to every supported currency.
    async fn latest_rates(&self, base: &str) -> Result<RateTable, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: A provider city record keeps open address and geoCode fields.
    #[test]
    fn city_location_deserializes_open_address_fields() {
        let city: CityLocation = serde_json::from_value(serde_json::json!({
            "type": "location",
            "subType": "city",
            "name": "ATHENS",
            "iataCode": "ATH",
            "address": {"countryCode": "GR", "stateCode": "GR-I"},
            "geoCode": {"latitude": 37.97945, "longitude": 23.71622}
        }))
        .unwrap();
        assert_eq!(city.iata_code.as_deref(), Some("ATH"));
        assert_eq!(city.country_code(), Some("GR"));
        assert_eq!(city.address["stateCode"], "GR-I");
        assert_eq!(city.geo_code.len(), 2);
    }

    /// **Scenario**: Hotel offers decode with price totals kept as strings.
    #[test]
    fn hotel_offers_deserialize_price_as_string() {
        let offers: HotelOffers = serde_json::from_value(serde_json::json!({
            "type": "hotel-offers",
            "hotel": {"hotelId": "HLATH001", "name": "Acropolis View"},
            "available": true,
            "offers": [{
                "id": "O1",
                "room": {"description": {"text": "Double room", "lang": "EN"}},
                "price": {"currency": "EUR", "total": "95.50"}
            }]
        }))
        .unwrap();
        assert_eq!(offers.offers[0].price.total.as_deref(), Some("95.50"));
        assert_eq!(offers, {
            let mut expected = HotelOffers::single("Acropolis View", "95.50", "EUR", "Double room");
            expected.hotel.hotel_id = Some("HLATH001".into());
            expected
        });
    }
}
