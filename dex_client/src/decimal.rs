// Decimal decoding for provider payloads.
//
// serde_json is built with `arbitrary_precision`, so a JSON number keeps its
// original text and is parsed straight into a Decimal without passing through f64.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{Result, TokenDataError};

/// Parse plain ("0.00012") or scientific ("1.2e-4") decimal text
pub fn parse_decimal_str(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Decode a JSON number or numeric string. Anything else yields `None`.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal_str(&number.to_string()),
        Value::String(text) => parse_decimal_str(text),
        _ => None,
    }
}

/// Field that must be present, numeric and non-negative
pub fn required_decimal(value: Option<&Value>, address: &str, field: &str) -> Result<Decimal> {
    match value {
        None | Some(Value::Null) => Err(TokenDataError::invalid_token(
            address,
            format!("missing field '{}'", field),
        )),
        Some(v) => checked(v, address, field),
    }
}

/// Field that defaults to zero when absent, but must be well-formed when present
pub fn optional_decimal(value: Option<&Value>, address: &str, field: &str) -> Result<Decimal> {
    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(v) => checked(v, address, field),
    }
}

fn checked(value: &Value, address: &str, field: &str) -> Result<Decimal> {
    let decimal = decimal_from_json(value).ok_or_else(|| {
        TokenDataError::invalid_token(address, format!("malformed numeric field '{}': {}", field, value))
    })?;

    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(TokenDataError::invalid_token(
            address,
            format!("negative value for '{}': {}", field, decimal),
        ));
    }

    Ok(decimal)
}
