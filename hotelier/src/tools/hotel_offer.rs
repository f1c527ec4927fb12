//! `get_best_offer`: cheapest hotel offer in a city for a party size and dates.
//!
//! The city's hotel ids are searched in batches of [`OFFER_BATCH_SIZE`]. A batch
//! that yields nothing (empty answer or provider fault) is retried up to
//! [`MAX_BATCH_ATTEMPTS`] times in total, then skipped. The single lowest price
//! over all batches wins; ties keep the first offer seen.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::provider::{HotelOffers, Offer, OfferQuery, ProviderError, TravelProvider};
use crate::tool_source::ToolSpec;

use super::{parse_args, Tool, ToolError, NO_OFFERS_FOUND};

pub const TOOL_GET_BEST_OFFER: &str = "get_best_offer";

/// Hotel ids per offer search request.
pub const OFFER_BATCH_SIZE: usize = 50;

/// Attempts per batch before it is given up.
pub const MAX_BATCH_ATTEMPTS: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BestOfferArgs {
    iata_city_code: String,
    people: u32,
    check_in_date: String,
    check_out_date: String,
}

/// The offer record returned to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOffer {
    pub hotel_name: String,
    /// Total as the provider formatted it (e.g. `"95.50"`).
    pub offer_total_accommodation_amount: String,
    pub offer_currency: String,
    pub offer_room_description: String,
    pub people: u32,
    pub check_in_date: String,
    pub check_out_date: String,
    /// Set when at least one batch of hotels could not be searched.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub search_incomplete: bool,
}

/// The winning offer and the hotel it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct OfferPick<'a> {
    pub hotel: &'a HotelOffers,
    pub offer: &'a Offer,
    pub total: f64,
}

/// Result of [`select_best_offer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferSelection<'a> {
    pub best: Option<OfferPick<'a>>,
    /// Offers skipped because their total was missing or not a non-negative number.
    pub unparsable: usize,
}

/// Picks the offer with the lowest total; a later offer replaces the current best
/// only when strictly cheaper.
pub fn select_best_offer(hotels: &[HotelOffers]) -> OfferSelection<'_> {
    let mut selection = OfferSelection::default();
    for hotel in hotels {
        for offer in &hotel.offers {
            let Some(total) = parse_total(offer) else {
                selection.unparsable += 1;
                continue;
            };
            if selection.best.map_or(true, |best| total < best.total) {
                selection.best = Some(OfferPick {
                    hotel,
                    offer,
                    total,
                });
            }
        }
    }
    selection
}

fn parse_total(offer: &Offer) -> Option<f64> {
    let total = offer.price.total.as_deref()?.trim().parse::<f64>().ok()?;
    (total.is_finite() && total >= 0.0).then_some(total)
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ToolError::InvalidInput(format!("`{}` must be a YYYY-MM-DD date: {}", field, e))
    })
}

enum BatchOutcome {
    Offers(Vec<HotelOffers>),
    /// Every attempt came back empty or failed; carries the error of the last
    /// attempt when that one was a provider fault.
    Exhausted(Option<ProviderError>),
}

/// Hotel best-offer search tool.
pub struct HotelOfferTool {
    provider: Arc<dyn TravelProvider>,
    batch_size: usize,
    max_attempts: usize,
}

impl HotelOfferTool {
    pub fn new(provider: Arc<dyn TravelProvider>) -> Self {
        Self {
            provider,
            batch_size: OFFER_BATCH_SIZE,
            max_attempts: MAX_BATCH_ATTEMPTS,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    async fn search_batch(&self, query: &OfferQuery, batch: usize) -> BatchOutcome {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.provider.search_hotel_offers(query).await {
                Ok(offers) if !offers.is_empty() => return BatchOutcome::Offers(offers),
                Ok(_) => {
                    debug!(batch, attempt, "offer search returned nothing");
                    last_error = None;
                }
                Err(e) => {
                    warn!(batch, attempt, error = %e, "offer search failed");
                    last_error = Some(e);
                }
            }
        }
        warn!(batch, attempts = self.max_attempts, "giving up on offer batch");
        BatchOutcome::Exhausted(last_error)
    }
}

#[async_trait]
impl Tool for HotelOfferTool {
    fn name(&self) -> &str {
        TOOL_GET_BEST_OFFER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_GET_BEST_OFFER.to_string(),
            description: Some(
                "Find the cheapest hotel offer in a city for a number of people and a stay period."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "iataCityCode": {
                        "type": "string",
                        "description": "IATA city code, e.g. ATH (see get_iata_of_city)"
                    },
                    "people": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of adult guests"
                    },
                    "checkInDate": {
                        "type": "string",
                        "description": "Check-in date, YYYY-MM-DD"
                    },
                    "checkOutDate": {
                        "type": "string",
                        "description": "Check-out date, YYYY-MM-DD"
                    }
                },
                "required": ["iataCityCode", "people", "checkInDate", "checkOutDate"]
            }),
            return_direct: false,
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let args: BestOfferArgs = parse_args(args)?;
        let check_in = parse_date("checkInDate", &args.check_in_date)?;
        let check_out = parse_date("checkOutDate", &args.check_out_date)?;
        if check_out <= check_in {
            return Err(ToolError::InvalidInput(
                "`checkOutDate` must be after `checkInDate`".to_string(),
            ));
        }
        if args.people == 0 {
            return Err(ToolError::InvalidInput("`people` must be at least 1".to_string()));
        }

        let city_code = args.iata_city_code.trim();
        let hotels = self
            .provider
            .list_hotels_by_city(city_code)
            .await
            .map_err(|source| ToolError::Provider {
                message: NO_OFFERS_FOUND,
                source,
            })?;
        let hotel_ids: Vec<String> = hotels.into_iter().map(|h| h.hotel_id).collect();
        if hotel_ids.is_empty() {
            return Err(ToolError::NotFound {
                message: NO_OFFERS_FOUND,
            });
        }

        let batch_count = hotel_ids.len().div_ceil(self.batch_size);
        info!(city_code, hotels = hotel_ids.len(), batches = batch_count, "searching hotel offers");

        let mut found = Vec::new();
        let mut exhausted = 0usize;
        let mut faulted = 0usize;
        let mut last_error = None;
        for (batch, ids) in hotel_ids.chunks(self.batch_size).enumerate() {
            let query = OfferQuery {
                hotel_ids: ids.to_vec(),
                adults: args.people,
                check_in,
                check_out,
            };
            match self.search_batch(&query, batch).await {
                BatchOutcome::Offers(offers) => found.extend(offers),
                BatchOutcome::Exhausted(error) => {
                    exhausted += 1;
                    if error.is_some() {
                        faulted += 1;
                        last_error = error;
                    }
                }
            }
        }

        let selection = select_best_offer(&found);
        let Some(pick) = selection.best else {
            if selection.unparsable > 0 {
                return Err(ToolError::Malformed {
                    message: NO_OFFERS_FOUND,
                    detail: format!("{} offers without a usable price", selection.unparsable),
                });
            }
            return Err(match last_error {
                Some(source) if exhausted == batch_count => ToolError::Provider {
                    message: NO_OFFERS_FOUND,
                    source,
                },
                _ => ToolError::NotFound {
                    message: NO_OFFERS_FOUND,
                },
            });
        };

        let description = pick
            .offer
            .room
            .as_ref()
            .and_then(|r| r.description.as_ref())
            .and_then(|d| d.text.clone())
            .unwrap_or_default();
        let best = BestOffer {
            hotel_name: pick.hotel.hotel.name.clone().unwrap_or_default(),
            offer_total_accommodation_amount: pick.offer.price.total.clone().unwrap_or_default(),
            offer_currency: pick.offer.price.currency.clone().unwrap_or_default(),
            offer_room_description: description,
            people: args.people,
            check_in_date: check_in.format(DATE_FORMAT).to_string(),
            check_out_date: check_out.format(DATE_FORMAT).to_string(),
            search_incomplete: faulted > 0,
        };
        serde_json::to_value(&best).map_err(|e| ToolError::Malformed {
            message: NO_OFFERS_FOUND,
            detail: e.to_string(),
        })
    }
}
