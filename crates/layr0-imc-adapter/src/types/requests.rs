/*
[INPUT]:  Validated domain values and credentials
[OUTPUT]: Request bodies serialized exactly as the server expects
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::Serialize;

use super::enums::Action;
use super::position::Position;

/// Body of `POST /api/v1/margin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginPayload<'a> {
    /// Only set when the key travels in the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<&'a str>,
    pub positions: &'a [Position],
}

/// Body of `POST /strategy/webhook/{webhook_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOrderPayload<'a> {
    pub symbol: &'a str,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<String>,
}
