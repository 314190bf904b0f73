/*
[INPUT]:  Caller-supplied leg parameters (Rust builders, YAML or JSON files)
[OUTPUT]: Validated, immutable Position legs and non-empty MarginRequest
[POS]:    Data layer - margin request model
[UPDATE]: When leg fields or validation rules change
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Action, Exchange, PriceType, Product};
use super::serde_helpers;
use crate::http::ValidationError;

/// Unvalidated leg as written by the caller.
///
/// Quantities may be given as numbers or strings; everything is checked by
/// [`PositionParams::build`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionParams {
    pub symbol: String,
    pub exchange: Exchange,
    pub action: Action,
    pub product: Product,
    #[serde(default)]
    pub pricetype: PriceType,
    #[serde(deserialize_with = "serde_helpers::deserialize_quantity")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_optional_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_optional_decimal")]
    pub trigger_price: Option<Decimal>,
    /// Contract lot size; when set, `quantity` must be a multiple of it.
    #[serde(default)]
    pub lot_size: Option<u64>,
}

impl PositionParams {
    /// Market order leg.
    pub fn new(
        symbol: impl Into<String>,
        exchange: Exchange,
        action: Action,
        product: Product,
        quantity: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            action,
            product,
            pricetype: PriceType::Market,
            quantity,
            price: None,
            trigger_price: None,
            lot_size: None,
        }
    }

    pub fn limit(mut self, price: Decimal) -> Self {
        self.pricetype = PriceType::Limit;
        self.price = Some(price);
        self
    }

    pub fn stop_limit(mut self, price: Decimal, trigger_price: Decimal) -> Self {
        self.pricetype = PriceType::StopLimit;
        self.price = Some(price);
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn stop_market(mut self, trigger_price: Decimal) -> Self {
        self.pricetype = PriceType::StopMarket;
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn with_lot_size(mut self, lot_size: u64) -> Self {
        self.lot_size = Some(lot_size);
        self
    }

    /// Validate as a standalone leg.
    pub fn build(self) -> Result<Position, ValidationError> {
        Position::from_params(self, 0)
    }
}

/// One validated leg of a margin request. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    symbol: String,
    exchange: Exchange,
    action: Action,
    product: Product,
    pricetype: PriceType,
    #[serde(serialize_with = "serde_helpers::serialize_u64_str")]
    quantity: u64,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    #[serde(
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    trigger_price: Option<Decimal>,
}

impl Position {
    /// Validate `params`, reporting errors against leg number `leg`.
    pub fn from_params(params: PositionParams, leg: usize) -> Result<Self, ValidationError> {
        let symbol = params.symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol { leg });
        }
        let exchange = Exchange::from(params.exchange.as_str());
        if exchange.as_str().is_empty() {
            return Err(ValidationError::EmptyCode {
                leg,
                field: "exchange",
            });
        }
        let product = Product::from(params.product.as_str());
        if product.as_str().is_empty() {
            return Err(ValidationError::EmptyCode {
                leg,
                field: "product",
            });
        }

        let quantity = match params.quantity {
            q if q < 0 => {
                return Err(ValidationError::NegativeQuantity { leg, quantity: q });
            }
            0 => return Err(ValidationError::ZeroQuantity { leg }),
            q => q as u64,
        };
        match params.lot_size {
            Some(0) => return Err(ValidationError::ZeroLotSize { leg }),
            Some(lot_size) if quantity % lot_size != 0 => {
                return Err(ValidationError::LotSizeMismatch {
                    leg,
                    quantity,
                    lot_size,
                });
            }
            _ => {}
        }

        let pricetype = params.pricetype;
        let price = match params.price {
            Some(price) if price < Decimal::ZERO => {
                return Err(ValidationError::NegativePrice { leg });
            }
            Some(price) => price,
            None if pricetype.requires_price() => {
                return Err(ValidationError::MissingPrice {
                    leg,
                    pricetype: pricetype.as_str(),
                });
            }
            None => Decimal::ZERO,
        };
        let trigger_price = match params.trigger_price {
            Some(trigger) if trigger < Decimal::ZERO => {
                return Err(ValidationError::NegativeTriggerPrice { leg });
            }
            Some(trigger) => Some(trigger),
            None if pricetype.requires_trigger() => {
                return Err(ValidationError::MissingTriggerPrice {
                    leg,
                    pricetype: pricetype.as_str(),
                });
            }
            None => None,
        };

        Ok(Self {
            symbol: symbol.to_string(),
            exchange,
            action: params.action,
            product,
            pricetype,
            quantity,
            price,
            trigger_price,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn pricetype(&self) -> PriceType {
        self.pricetype
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn trigger_price(&self) -> Option<Decimal> {
        self.trigger_price
    }
}

impl TryFrom<PositionParams> for Position {
    type Error = ValidationError;

    fn try_from(params: PositionParams) -> Result<Self, Self::Error> {
        Position::from_params(params, 0)
    }
}

/// Non-empty set of legs evaluated together by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginRequest {
    positions: Vec<Position>,
}

impl MarginRequest {
    pub fn new(positions: Vec<Position>) -> Result<Self, ValidationError> {
        if positions.is_empty() {
            return Err(ValidationError::EmptyRequest);
        }
        Ok(Self { positions })
    }

    /// Validate every leg; the first failing leg is reported with its index.
    pub fn from_params(params: Vec<PositionParams>) -> Result<Self, ValidationError> {
        let positions = params
            .into_iter()
            .enumerate()
            .map(|(leg, params)| Position::from_params(params, leg))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
