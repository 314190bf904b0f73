/*
[INPUT]:  Wire codes used by the trading API (exchange, product, action, price type)
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the server adds segments, products or price types
*/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    #[serde(alias = "buy")]
    Buy,
    #[serde(alias = "sell")]
    Sell,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Action::Buy => Action::Sell,
            Action::Sell => Action::Buy,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order price type.
///
/// The server spells stop orders `SL` (stop-limit) and `SL-M` (stop-market);
/// the long spellings are accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceType {
    #[default]
    #[serde(rename = "MARKET")]
    Market,
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "SL", alias = "STOP-LIMIT", alias = "STOP_LIMIT")]
    StopLimit,
    #[serde(rename = "SL-M", alias = "STOP-MARKET", alias = "STOP_MARKET")]
    StopMarket,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Market => "MARKET",
            PriceType::Limit => "LIMIT",
            PriceType::StopLimit => "SL",
            PriceType::StopMarket => "SL-M",
        }
    }

    /// Limit price must be supplied by the caller.
    pub fn requires_price(&self) -> bool {
        matches!(self, PriceType::Limit | PriceType::StopLimit)
    }

    /// Trigger price must be supplied by the caller.
    pub fn requires_trigger(&self) -> bool {
        matches!(self, PriceType::StopLimit | PriceType::StopMarket)
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market segment. Unknown codes are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Exchange {
    Nse,
    Bse,
    Nfo,
    Bfo,
    Cds,
    Bcd,
    Mcx,
    Ncdex,
    NseIndex,
    BseIndex,
    Other(String),
}

impl Exchange {
    pub fn as_str(&self) -> &str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
            Exchange::Nfo => "NFO",
            Exchange::Bfo => "BFO",
            Exchange::Cds => "CDS",
            Exchange::Bcd => "BCD",
            Exchange::Mcx => "MCX",
            Exchange::Ncdex => "NCDEX",
            Exchange::NseIndex => "NSE_INDEX",
            Exchange::BseIndex => "BSE_INDEX",
            Exchange::Other(code) => code,
        }
    }

    /// Futures & options, currency and commodity segments.
    pub fn is_derivatives(&self) -> bool {
        matches!(
            self,
            Exchange::Nfo
                | Exchange::Bfo
                | Exchange::Cds
                | Exchange::Bcd
                | Exchange::Mcx
                | Exchange::Ncdex
        )
    }
}

impl From<&str> for Exchange {
    fn from(value: &str) -> Self {
        let code = value.trim();
        match code.to_ascii_uppercase().as_str() {
            "NSE" => Exchange::Nse,
            "BSE" => Exchange::Bse,
            "NFO" => Exchange::Nfo,
            "BFO" => Exchange::Bfo,
            "CDS" => Exchange::Cds,
            "BCD" => Exchange::Bcd,
            "MCX" => Exchange::Mcx,
            "NCDEX" => Exchange::Ncdex,
            "NSE_INDEX" => Exchange::NseIndex,
            "BSE_INDEX" => Exchange::BseIndex,
            _ => Exchange::Other(code.to_string()),
        }
    }
}

impl From<String> for Exchange {
    fn from(value: String) -> Self {
        Exchange::from(value.as_str())
    }
}

impl From<Exchange> for String {
    fn from(value: Exchange) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Margin/settlement mode. Unknown codes are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Product {
    /// Cash and carry (delivery)
    Cnc,
    /// Margin intraday square-off
    Mis,
    /// Normal F&O carry forward
    Nrml,
    Other(String),
}

impl Product {
    pub fn as_str(&self) -> &str {
        match self {
            Product::Cnc => "CNC",
            Product::Mis => "MIS",
            Product::Nrml => "NRML",
            Product::Other(code) => code,
        }
    }
}

impl From<&str> for Product {
    fn from(value: &str) -> Self {
        let code = value.trim();
        match code.to_ascii_uppercase().as_str() {
            "CNC" => Product::Cnc,
            "MIS" => Product::Mis,
            "NRML" => Product::Nrml,
            _ => Product::Other(code.to_string()),
        }
    }
}

impl From<String> for Product {
    fn from(value: String) -> Self {
        Product::from(value.as_str())
    }
}

impl From<Product> for String {
    fn from(value: Product) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
