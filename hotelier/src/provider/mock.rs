//! Scripted in-memory providers for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    CityLocation, HotelOffers, HotelRef, OfferQuery, ProviderError, RateProvider, RateTable,
    TravelProvider,
};

/// Travel provider answering from fixed data.
///
/// Offers are keyed by hotel id; an offer search returns the offers of the
/// requested ids that have any, in request order. The first `offer_failures`
/// searches fail with a transport error.
#[derive(Default)]
pub struct MockTravelProvider {
    cities: Vec<CityLocation>,
    city_error: bool,
    hotels: Vec<HotelRef>,
    offers: HashMap<String, HotelOffers>,
    offer_failures: usize,
    offer_calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockTravelProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cities(mut self, cities: Vec<CityLocation>) -> Self {
        self.cities = cities;
        self
    }

    /// City search fails with a transport error.
    pub fn with_city_error(mut self) -> Self {
        self.city_error = true;
        self
    }

    /// Registers hotel ids without offers.
    pub fn with_hotel_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.hotels.extend(ids.into_iter().map(|id| HotelRef {
            hotel_id: id.into(),
            name: None,
        }));
        self
    }

    /// Registers a hotel and its offers.
    pub fn with_hotel_offers(mut self, hotel_id: impl Into<String>, offers: HotelOffers) -> Self {
        let hotel_id = hotel_id.into();
        self.hotels.push(HotelRef {
            hotel_id: hotel_id.clone(),
            name: offers.hotel.name.clone(),
        });
        self.offers.insert(hotel_id, offers);
        self
    }

    /// The first `n` offer searches fail.
    pub fn with_offer_failures(mut self, n: usize) -> Self {
        self.offer_failures = n;
        self
    }

    /// Number of offer searches made so far.
    pub fn offer_calls(&self) -> usize {
        self.offer_calls.load(Ordering::SeqCst)
    }

    /// Hotel id batches of every offer search, in call order.
    pub async fn offer_batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl TravelProvider for MockTravelProvider {
    async fn search_cities(&self, _keyword: &str) -> Result<Vec<CityLocation>, ProviderError> {
        if self.city_error {
            return Err(ProviderError::Transport("connection refused".into()));
        }
        Ok(self.cities.clone())
    }

    async fn list_hotels_by_city(&self, _city_code: &str) -> Result<Vec<HotelRef>, ProviderError> {
        Ok(self.hotels.clone())
    }

    async fn search_hotel_offers(
        &self,
        query: &OfferQuery,
    ) -> Result<Vec<HotelOffers>, ProviderError> {
        let call = self.offer_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().await.push(query.hotel_ids.clone());
        if call < self.offer_failures {
            return Err(ProviderError::Transport("timed out".into()));
        }
        Ok(query
            .hotel_ids
            .iter()
            .filter_map(|id| self.offers.get(id).cloned())
            .collect())
    }
}

/// Rate provider answering from fixed tables.
#[derive(Default)]
pub struct MockRateProvider {
    tables: HashMap<String, RateTable>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one rate `base → target`.
    pub fn with_rate(mut self, base: &str, target: &str, rate: f64) -> Self {
        let table = self.tables.entry(base.to_string()).or_insert_with(|| RateTable {
            base_code: Some(base.to_string()),
            conversion_rates: HashMap::from([(base.to_string(), 1.0)]),
        });
        table.conversion_rates.insert(target.to_string(), rate);
        self
    }

    /// Every request fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    async fn latest_rates(&self, base: &str) -> Result<RateTable, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        Ok(self.tables.get(base).cloned().unwrap_or_default())
    }
}
