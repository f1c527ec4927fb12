//! ExchangeRate-API client: latest conversion rates for a base currency.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, RateProvider, RateTable};

pub const DEFAULT_EXCHANGE_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Deserialize)]
struct LatestResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    base_code: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

/// Rate provider backed by `GET {base}/{key}/latest/{currency}`.
pub struct ExchangeRateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_EXCHANGE_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(self)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    async fn latest_rates(&self, base: &str) -> Result<RateTable, ProviderError> {
        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, base);
        debug!(base = %base, "exchange rate request");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        // Error payloads come with 4xx statuses but still carry `error-type`.
        let body = response.text().await?;
        let parsed: LatestResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(ProviderError::Decode(e.to_string())),
        };
        if parsed.result.as_deref() == Some("error") || !status.is_success() {
            return Err(ProviderError::Api(
                parsed
                    .error_type
                    .unwrap_or_else(|| format!("status {}", status.as_u16())),
            ));
        }
        Ok(RateTable {
            base_code: parsed.base_code,
            conversion_rates: parsed.conversion_rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn read_request_line(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&tmp[..n]);
        }
        String::from_utf8_lossy(&buf)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    async fn write_http_response(stream: &mut TcpStream, status: &str, body: &str) {
        let resp = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(resp.as_bytes()).await.unwrap();
    }

    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let line = read_request_line(&mut stream).await;
            write_http_response(&mut stream, status, body).await;
            line
        });
        (format!("http://{}", addr), handle)
    }

    /// **Scenario**: Successful response yields the conversion table; the key and base are in the path.
    #[tokio::test]
    async fn latest_rates_returns_conversion_table() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"result":"success","base_code":"EUR","conversion_rates":{"EUR":1,"USD":1.08}}"#,
        )
        .await;
        let client = ExchangeRateClient::new("k123").with_base_url(base_url);
        let table = client.latest_rates("EUR").await.unwrap();
        assert_eq!(table.rate("USD"), Some(1.08));
        assert_eq!(table.base_code.as_deref(), Some("EUR"));
        let line = server.await.unwrap();
        assert!(line.starts_with("GET /k123/latest/EUR "), "{}", line);
    }

    /// **Scenario**: An error payload maps to ProviderError::Api with the error type.
    #[tokio::test]
    async fn latest_rates_maps_error_payload() {
        let (base_url, server) = serve_once(
            "404 Not Found",
            r#"{"result":"error","error-type":"unsupported-code"}"#,
        )
        .await;
        let client = ExchangeRateClient::new("k").with_base_url(base_url);
        let err = client.latest_rates("XXX").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api(ref t) if t == "unsupported-code"), "{:?}", err);
        server.await.unwrap();
    }

    /// **Scenario**: A non-JSON failure body maps to ProviderError::Status.
    #[tokio::test]
    async fn latest_rates_maps_plain_failure_to_status() {
        let (base_url, server) = serve_once("503 Service Unavailable", "down").await;
        let client = ExchangeRateClient::new("k").with_base_url(base_url);
        let err = client.latest_rates("EUR").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 503, .. }), "{:?}", err);
        server.await.unwrap();
    }
}
