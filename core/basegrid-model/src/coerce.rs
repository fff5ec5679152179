//! Lenient coercion for client-supplied values.
//!
//! Grid saves never reject a batch because of one malformed entry: numbers
//! are truncated, numeric strings are read up to the first non-digit, and
//! anything else collapses to zero.

use serde_json::Value;

use crate::record::UNKNOWN_ITEM_TYPE;

/// Coerces a JSON value to an integer, defaulting to 0.
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(s),
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Reads an optional sign followed by decimal digits, ignoring leading
/// whitespace and any trailing text. Returns 0 when no digits are found
/// and saturates on overflow.
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        acc = acc.saturating_mul(10).saturating_add(digit);
    }
    if negative { acc.saturating_neg() } else { acc }
}

/// Coerces a placement's kind tag; missing or blank tags become `"unknown"`.
pub fn coerce_item_type(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN_ITEM_TYPE.to_string(),
    }
}

/// Normalizes a submitted color so it always carries a leading `#`.
/// Blank or missing input falls back to `default`.
pub fn normalize_color(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(color) if color.starts_with('#') => color.to_string(),
        Some(color) => format!("#{color}"),
        None => default.to_string(),
    }
}
