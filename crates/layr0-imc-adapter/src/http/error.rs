/*
[INPUT]:  Error sources (input validation, transport, API, serialization)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Local input problem detected before any request is sent.
///
/// Leg-level variants carry the zero-based index of the offending leg.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("margin request must contain at least one position")]
    EmptyRequest,

    #[error("leg {leg}: symbol must not be empty")]
    EmptySymbol { leg: usize },

    #[error("leg {leg}: {field} code must not be empty")]
    EmptyCode { leg: usize, field: &'static str },

    #[error("leg {leg}: quantity must be positive")]
    ZeroQuantity { leg: usize },

    #[error("leg {leg}: quantity {quantity} is negative")]
    NegativeQuantity { leg: usize, quantity: i64 },

    #[error("leg {leg}: lot size must be positive")]
    ZeroLotSize { leg: usize },

    #[error("leg {leg}: quantity {quantity} is not a multiple of lot size {lot_size}")]
    LotSizeMismatch {
        leg: usize,
        quantity: u64,
        lot_size: u64,
    },

    #[error("leg {leg}: price is required for {pricetype} orders")]
    MissingPrice { leg: usize, pricetype: &'static str },

    #[error("leg {leg}: price must not be negative")]
    NegativePrice { leg: usize },

    #[error("leg {leg}: trigger price is required for {pricetype} orders")]
    MissingTriggerPrice { leg: usize, pricetype: &'static str },

    #[error("leg {leg}: trigger price must not be negative")]
    NegativeTriggerPrice { leg: usize },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} {value:?} is not a single URL path segment")]
    InvalidPathSegment { field: &'static str, value: String },
}

/// Main error type for the layr0-imc adapter
#[derive(Error, Debug)]
pub enum Layr0Error {
    /// Request rejected locally, nothing was sent
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Network-level failure (connection refused, DNS, TLS, broken body)
    #[error("Transport failure: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request exceeded the configured timeout
    #[error("Request timed out after {}s", .duration.as_secs())]
    Timeout { duration: Duration },

    /// Server answered with a non-success status and no usable error envelope
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Response body did not match the documented envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Layr0Error {
    /// Wrap any transport-layer cause.
    pub fn transport(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Layr0Error::Transport {
            source: source.into(),
        }
    }

    /// Check if the error is worth retrying. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Layr0Error::Transport { .. } | Layr0Error::Timeout { .. } => true,
            Layr0Error::Api { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Get retry delay in seconds (if retryable)
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            Layr0Error::Timeout { .. } => Some(1),
            Layr0Error::Api { code: 429, .. } => Some(5),
            _ => None,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Layr0Error::Validation(_))
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        Layr0Error::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for layr0-imc operations
pub type Result<T> = std::result::Result<T, Layr0Error>;
