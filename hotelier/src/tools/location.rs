//! `get_iata_of_city`: resolve a city name and country to IATA city codes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::provider::{CityLocation, TravelProvider};
use crate::tool_source::ToolSpec;

use super::{parse_args, Tool, ToolError, CITY_NOT_FOUND};

pub const TOOL_GET_IATA_OF_CITY: &str = "get_iata_of_city";

#[derive(Deserialize)]
struct LocationArgs {
    city: String,
    country: String,
}

/// Location resolution tool.
pub struct LocationTool {
    provider: Arc<dyn TravelProvider>,
}

impl LocationTool {
    pub fn new(provider: Arc<dyn TravelProvider>) -> Self {
        Self { provider }
    }
}

/// Keeps the cities whose country code equals `country`; when none does, keeps all
/// of them. Returns `IATA code → {name, address fields, geoCode fields}`; cities
/// without an IATA code are skipped.
pub fn resolve_locations(cities: &[CityLocation], country: &str) -> Map<String, Value> {
    let matching: Vec<&CityLocation> = cities
        .iter()
        .filter(|c| c.country_code() == Some(country))
        .collect();
    let selected = if matching.is_empty() {
        debug!(country, candidates = cities.len(), "no city in country, using all matches");
        cities.iter().collect()
    } else {
        matching
    };

    selected
        .into_iter()
        .filter_map(|city| {
            let code = city.iata_code.as_ref()?;
            let mut record = Map::new();
            record.insert("name".to_string(), Value::String(city.name.clone()));
            record.extend(city.address.iter().map(|(k, v)| (k.clone(), v.clone())));
            record.extend(city.geo_code.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some((code.clone(), Value::Object(record)))
        })
        .collect()
}

#[async_trait]
impl Tool for LocationTool {
    fn name(&self) -> &str {
        TOOL_GET_IATA_OF_CITY
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_GET_IATA_OF_CITY.to_string(),
            description: Some(
                "Get the IATA city code of a city. Returns a mapping from IATA code to the city's name, address and coordinates."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name in English, e.g. Athens"
                    },
                    "country": {
                        "type": "string",
                        "description": "ISO 3166-1 alpha-2 country code, e.g. GR"
                    }
                },
                "required": ["city", "country"]
            }),
            return_direct: false,
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let args: LocationArgs = parse_args(args)?;
        let cities = self
            .provider
            .search_cities(args.city.trim())
            .await
            .map_err(|source| ToolError::Provider {
                message: CITY_NOT_FOUND,
                source,
            })?;
        let locations = resolve_locations(&cities, args.country.trim());
        if locations.is_empty() {
            return Err(ToolError::NotFound {
                message: CITY_NOT_FOUND,
            });
        }
        Ok(Value::Object(locations))
    }
}
