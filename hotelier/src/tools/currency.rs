//! `get_price_in_wanted_currency`: convert a price with the latest exchange rate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::RateProvider;
use crate::tool_source::ToolSpec;

use super::{parse_args, Tool, ToolError, PRICE_NOT_ESTIMATED};

pub const TOOL_GET_PRICE_IN_WANTED_CURRENCY: &str = "get_price_in_wanted_currency";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyArgs {
    wanted_currency: String,
    current_currency: String,
    price: f64,
}

/// Renders a converted amount as its shortest round-trip decimal, always with a
/// fractional part (`108.0`, `95.5`, `0.1`) and never in exponent form, however
/// large or small the amount.
pub fn format_price(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn currency_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Currency conversion tool.
pub struct CurrencyTool {
    rates: Arc<dyn RateProvider>,
}

impl CurrencyTool {
    pub fn new(rates: Arc<dyn RateProvider>) -> Self {
        Self { rates }
    }
}

#[async_trait]
impl Tool for CurrencyTool {
    fn name(&self) -> &str {
        TOOL_GET_PRICE_IN_WANTED_CURRENCY
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_GET_PRICE_IN_WANTED_CURRENCY.to_string(),
            description: Some(
                "Convert a price from its current currency to the wanted currency using the latest exchange rate."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "wantedCurrency": {
                        "type": "string",
                        "description": "ISO 4217 code of the target currency, e.g. USD"
                    },
                    "currentCurrency": {
                        "type": "string",
                        "description": "ISO 4217 code the price is expressed in, e.g. EUR"
                    },
                    "price": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Amount to convert"
                    }
                },
                "required": ["wantedCurrency", "currentCurrency", "price"]
            }),
            return_direct: false,
        }
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let args: CurrencyArgs = parse_args(args)?;
        if !args.price.is_finite() || args.price < 0.0 {
            return Err(ToolError::InvalidInput(
                "`price` must be a non-negative number".to_string(),
            ));
        }
        let current = currency_code(&args.current_currency);
        let wanted = currency_code(&args.wanted_currency);

        let table = self
            .rates
            .latest_rates(&current)
            .await
            .map_err(|source| ToolError::Provider {
                message: PRICE_NOT_ESTIMATED,
                source,
            })?;
        let rate = table.rate(&wanted).ok_or(ToolError::NotFound {
            message: PRICE_NOT_ESTIMATED,
        })?;
        debug!(%current, %wanted, rate, "converting price");

        Ok(json!({ "price": format_price(args.price * rate) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRateProvider;

    /// **Scenario**: Whole amounts keep one fractional digit.
    #[test]
    fn format_price_renders_shortest_decimal() {
        assert_eq!(format_price(100.0 * 1.08), "108.0");
        assert_eq!(format_price(95.5), "95.5");
        assert_eq!(format_price(0.0), "0.0");
        assert_eq!(format_price(95.5 * 1.08), "103.14");
    }

    /// **Scenario**: Very large and very small amounts stay in plain decimal notation.
    #[test]
    fn format_price_never_uses_exponent_form() {
        assert_eq!(format_price(1e16), "10000000000000000.0");
        assert_eq!(format_price(2.5e20), "250000000000000000000.0");
        assert_eq!(format_price(1e-7), "0.0000001");
        assert!(!format_price(123456789.125e-12).contains('e'));
    }

    /// **Scenario**: Lowercase or padded codes are normalized before lookup.
    #[tokio::test]
    async fn call_normalizes_currency_codes() {
        let tool = CurrencyTool::new(Arc::new(
            MockRateProvider::new().with_rate("EUR", "USD", 2.0),
        ));
        let out = tool
            .call(json!({"wantedCurrency": " usd", "currentCurrency": "eur ", "price": 10}))
            .await
            .unwrap();
        assert_eq!(out, json!({"price": "20.0"}));
    }

    /// **Scenario**: A currency missing from the rate table is a not-found failure.
    #[tokio::test]
    async fn call_unknown_target_currency_is_not_found() {
        let tool = CurrencyTool::new(Arc::new(
            MockRateProvider::new().with_rate("EUR", "USD", 1.08),
        ));
        let err = tool
            .call(json!({"wantedCurrency": "XYZ", "currentCurrency": "EUR", "price": 10}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.message(), PRICE_NOT_ESTIMATED);
    }

    /// **Scenario**: A failing rate service maps to a provider fault.
    #[tokio::test]
    async fn call_provider_failure_is_provider_fault() {
        let tool = CurrencyTool::new(Arc::new(MockRateProvider::failing()));
        let err = tool
            .call(json!({"wantedCurrency": "USD", "currentCurrency": "EUR", "price": 10}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "provider_fault");
        assert_eq!(err.to_value()["error"], PRICE_NOT_ESTIMATED);
    }

    /// **Scenario**: Negative prices are rejected before any rate lookup.
    #[tokio::test]
    async fn call_negative_price_is_invalid() {
        let rates = Arc::new(MockRateProvider::new().with_rate("EUR", "USD", 1.08));
        let tool = CurrencyTool::new(rates.clone());
        let err = tool
            .call(json!({"wantedCurrency": "USD", "currentCurrency": "EUR", "price": -1}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(rates.calls(), 0);
    }
}
