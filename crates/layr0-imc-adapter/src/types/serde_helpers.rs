/*
[INPUT]:  Loosely typed JSON/YAML scalars (numbers or numeric strings)
[OUTPUT]: Exact Decimal / integer values for typed models
[POS]:    Data layer - shared serde adapters
[UPDATE]: When the server changes how numbers are encoded
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a JSON number or numeric string without going through `f64`, so
/// `3752.50` stays `3752.50`. Relies on serde_json's `arbitrary_precision`
/// keeping the number's source text.
fn decimal_from_value<E: serde::de::Error>(value: &Value) -> Result<Option<Decimal>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .map(Some)
            .map_err(E::custom),
        Value::Number(number) => {
            let raw = number.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .map(Some)
                .map_err(E::custom)
        }
        other => Err(E::custom(format!("invalid decimal value: {other}"))),
    }
}

pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(&value)?.ok_or_else(|| serde::de::Error::custom("missing decimal value"))
}

/// Pair with `#[serde(default)]`: an absent key and `null` both map to `None`.
pub fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(&value)
}

/// Accepts `10`, `"10"` and `" 10 "`.
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("quantity must be an integer: {number}"))),
        Value::String(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|err| serde::de::Error::custom(format!("invalid quantity {raw:?}: {err}"))),
        other => Err(serde::de::Error::custom(format!("invalid quantity: {other}"))),
    }
}

pub fn serialize_u64_str<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}
