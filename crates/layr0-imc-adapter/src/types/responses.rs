/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Raw `{status, data | message}` envelope returned by the server.
///
/// `data` stays untyped until the status says it holds a breakdown; error
/// envelopes may carry an empty or unrelated `data` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarginEnvelope {
    pub status: ResponseStatus,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MarginEnvelope {
    /// Typed `data`, or `None` when it is absent or `null`.
    pub fn breakdown(&self) -> Option<serde_json::Result<MarginBreakdown>> {
        self.data
            .as_ref()
            .filter(|data| !data.is_null())
            .map(|data| MarginBreakdown::deserialize(data))
    }
}

/// Margin components computed by the server.
///
/// `span_margin` and `exposure_margin` are `None` when the server leaves
/// them out, which is not the same as a computed zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginBreakdown {
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal")]
    pub total_margin_required: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub span_margin: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub exposure_margin: Option<Decimal>,
}

/// Outcome of one margin request. A server-side rejection is a normal
/// `Failure`, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum MarginResult {
    Success(MarginBreakdown),
    Failure { message: String },
}

impl MarginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MarginResult::Success(_))
    }

    pub fn breakdown(&self) -> Option<&MarginBreakdown> {
        match self {
            MarginResult::Success(breakdown) => Some(breakdown),
            MarginResult::Failure { .. } => None,
        }
    }

    pub fn total_margin_required(&self) -> Option<Decimal> {
        self.breakdown().map(|breakdown| breakdown.total_margin_required)
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            MarginResult::Failure { message } => Some(message),
            MarginResult::Success(_) => None,
        }
    }
}

/// Acknowledgement from the strategy webhook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategyOrderResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
