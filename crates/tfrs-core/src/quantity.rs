//! # Quantities
//!
//! Fuel quantities are stored in cells as numeric strings without
//! separators. Three conversions exist:
//!
//! - [`clean_quantity`]: what a user typed → stored value. Thousands
//!   separators are stripped; input that is not a number becomes empty.
//! - [`normalize_quantity`]: a persisted record's quantity (JSON number or
//!   decimal string) → stored value, so `"1234.00"` becomes `"1234"`.
//! - [`format_quantity`]: stored value → display text with thousands
//!   separators. Applied only at render time.
//!
//! Coercion never fails: malformed input becomes the empty string.

use serde_json::Value;

/// Parse a stored or typed quantity into a finite number.
///
/// Surrounding whitespace is ignored. Empty input, non-numeric text and
/// non-finite values (`inf`, `NaN`) yield `None`.
pub fn parse_quantity(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `f64::from_str` accepts "inf"/"nan" spellings; digits are required here.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Clean a typed quantity for storage.
///
/// ```
/// use tfrs_core::clean_quantity;
/// assert_eq!(clean_quantity("1,234"), "1234");
/// assert_eq!(clean_quantity("12a"), "");
/// assert_eq!(clean_quantity(""), "");
/// ```
pub fn clean_quantity(typed: &str) -> String {
    let stripped: String = typed.chars().filter(|c| *c != ',').collect();
    let stripped = stripped.trim();
    match parse_quantity(stripped) {
        Some(_) => stripped.to_string(),
        None => String::new(),
    }
}

/// Normalize a persisted quantity for storage.
///
/// Numbers and numeric strings are rendered in their shortest form
/// (`1234.00` → `"1234"`, `0.5` → `"0.5"`). Anything else, including
/// `null`, becomes empty.
pub fn normalize_quantity(value: &Value) -> String {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_quantity(s),
        _ => None,
    };
    number.map(render_number).unwrap_or_default()
}

fn render_number(n: f64) -> String {
    // f64's Display never switches to exponent notation and drops a zero
    // fractional part, which is the shortest round-tripping form we want.
    format!("{n}")
}

/// Insert thousands separators into the integer digits of a stored value.
///
/// The fractional part is left untouched. Values that do not start with a
/// digit (after an optional sign) are returned unchanged.
///
/// ```
/// use tfrs_core::format_quantity;
/// assert_eq!(format_quantity("1234"), "1,234");
/// assert_eq!(format_quantity("-1234567.125"), "-1,234,567.125");
/// assert_eq!(format_quantity(""), "");
/// ```
pub fn format_quantity(stored: &str) -> String {
    let (sign, rest) = match stored.strip_prefix(['-', '+']) {
        Some(rest) => (&stored[..1], rest),
        None => ("", stored),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return stored.to_string();
    }
    let (digits, tail) = rest.split_at(digits_end);

    let mut out = String::with_capacity(stored.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push_str(tail);
    out
}
