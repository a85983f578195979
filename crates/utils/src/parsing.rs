//! Permissive readers for persisted values.
//!
//! Nothing here returns an error: a missing or malformed value reads as
//! zero, an empty map or `None`.

use models::FinancialData;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parses a stored number. Missing, unparseable and non-finite values read as `0.0`.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses a stored `{"name": balance}` object.
///
/// Malformed JSON (or anything that is not an object) reads as an empty map.
/// Entries whose value is not numeric keep their name with a zero balance.
pub fn parse_balance_map(raw: Option<&str>) -> BTreeMap<String, f64> {
    let Some(raw) = raw else {
        return BTreeMap::new();
    };

    match serde_json::from_str::<serde_json::Map<String, Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .map(|(name, value)| {
                let balance = match &value {
                    Value::Number(n) => n.as_f64().unwrap_or(0.0),
                    Value::String(s) => parse_amount(Some(s)),
                    _ => 0.0,
                };
                (name, balance)
            })
            .collect(),
        Err(e) => {
            tracing::debug!("Ignoring malformed balance map: {}", e);
            BTreeMap::new()
        }
    }
}

pub fn parse_financial_data(raw: Option<&str>) -> Option<FinancialData> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}
