//! Typed tool failures and their mapping onto tool results.
//!
//! Each failure keeps the user-facing message of its tool (`"city not found"`, ...)
//! and adds a machine-readable `kind`, so "nothing matched" and "the provider is
//! down" stay distinguishable in logs and for the model.

use serde_json::{json, Value};
use thiserror::Error;

use crate::provider::ProviderError;

pub const CITY_NOT_FOUND: &str = "city not found";
pub const NO_OFFERS_FOUND: &str = "no offers found";
pub const PRICE_NOT_ESTIMATED: &str = "could not estimate price";

/// Why a tool could not produce its result.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The request was valid but nothing matched.
    #[error("{message}")]
    NotFound { message: &'static str },

    /// The provider could not be reached or refused the request.
    #[error("{message}: {source}")]
    Provider {
        message: &'static str,
        source: ProviderError,
    },

    /// The provider answered with data that could not be interpreted.
    #[error("{message}: {detail}")]
    Malformed {
        message: &'static str,
        detail: String,
    },

    /// Arguments did not match the tool's schema.
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Provider { .. } => "provider_fault",
            Self::Malformed { .. } => "malformed_response",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// The message the model sees under `"error"`.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Provider { message, .. }
            | Self::Malformed { message, .. } => message,
            Self::InvalidInput(_) => "invalid arguments",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => None,
            Self::Provider { source, .. } => Some(source.to_string()),
            Self::Malformed { detail, .. } => Some(detail.clone()),
            Self::InvalidInput(reason) => Some(reason.clone()),
        }
    }

    /// Tool-result mapping: `{"error": message, "kind": kind, "detail"?: ...}`.
    pub fn to_value(&self) -> Value {
        let mut value = json!({ "error": self.message(), "kind": self.kind() });
        if let Some(detail) = self.detail() {
            value["detail"] = Value::String(detail);
        }
        value
    }
}
