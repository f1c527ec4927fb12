//! Amadeus Self-Service client: city search, hotel listing, hotel offer search.
//!
//! Authenticates with the OAuth2 client-credentials flow. The access token is
//! fetched on first use and cached until shortly before it expires; a 401 drops
//! the cached token so the next request re-authenticates.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{CityLocation, HotelOffers, HotelRef, OfferQuery, ProviderError, TravelProvider};

/// Test environment of the Amadeus Self-Service APIs.
pub const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";

/// Refresh the token this long before the provider says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    1799
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Travel provider backed by the Amadeus REST APIs.
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

impl AmadeusClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_AMADEUS_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        }
    }

    /// Overrides the API base URL (e.g. production host or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets a per-request timeout on the underlying HTTP client.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(self)
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        debug!(url = %url, "amadeus token request");
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!("{}: {}", status.as_u16(), body)));
        }
        let token: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token.access_token)
    }

    /// GET `path` with `query`, returning the `data` array of the response.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "amadeus request");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.token.lock().await.take();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "amadeus request failed");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let envelope: DataEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl TravelProvider for AmadeusClient {
    async fn search_cities(&self, keyword: &str) -> Result<Vec<CityLocation>, ProviderError> {
        self.get_data(
            "/v1/reference-data/locations/cities",
            &[("keyword", keyword.to_string())],
        )
        .await
    }

    async fn list_hotels_by_city(&self, city_code: &str) -> Result<Vec<HotelRef>, ProviderError> {
        self.get_data(
            "/v1/reference-data/locations/hotels/by-city",
            &[("cityCode", city_code.to_string())],
        )
        .await
    }

    async fn search_hotel_offers(
        &self,
        query: &OfferQuery,
    ) -> Result<Vec<HotelOffers>, ProviderError> {
        self.get_data(
            "/v3/shopping/hotel-offers",
            &[
                ("hotelIds", query.hotel_ids.join(",")),
                ("adults", query.adults.to_string()),
                ("checkInDate", query.check_in.format("%Y-%m-%d").to_string()),
                ("checkOutDate", query.check_out.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }
}
