//! Form-field parsing with the lenient semantics of browser number inputs.
//!
//! Edits never fail: an unparseable field resolves to a fallback so no NaN or missing value can
//! reach the state tree. The `*_strict` variants exist for callers that want to reject input.

use crate::foundation::error::{TickdownError, TickdownResult};

/// Leading-integer parse: `"12abc"` -> 12, `"-3.7"` -> -3, `"abc"` -> 0.
pub fn parse_int_input(s: &str) -> i64 {
    int_prefix(s).unwrap_or(0)
}

/// Leading-decimal parse: `"2.5s"` -> 2.5, `"abc"` -> `None`.
pub fn parse_float_input(s: &str) -> Option<f64> {
    float_prefix(s)
}

/// Duration field: any non-positive or unparseable value resolves to one second.
pub fn parse_duration_input(s: &str) -> f64 {
    match float_prefix(s) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    }
}

pub fn parse_int_strict(s: &str) -> TickdownResult<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| TickdownError::invalid_input(format!("expected an integer, got '{s}'")))
}

pub fn parse_float_strict(s: &str) -> TickdownResult<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TickdownError::invalid_input(format!(
            "expected a number, got '{s}'"
        ))),
    }
}

fn int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = split_sign(s);
    let digits: &str = &rest[..rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    let mut v: i64 = 0;
    for b in digits.bytes() {
        v = v.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    Some(if neg { -v } else { v })
}

fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    s[..i].parse::<f64>().ok()
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/input.rs"]
mod tests;
