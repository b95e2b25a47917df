//! Scalar ⇄ string rules shared by both walkers.
//!
//! Rendering is canonical (one string per value); parsing is permissive so
//! that wire data written by older providers still decodes.
use std::fmt;

use serde_json::Number;

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// The scalar kind a leaf is being coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Uint,
    Float,
    Str,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Uint => "unsigned integer",
            Self::Float => "float",
            Self::Str => "string",
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDER
// ————————————————————————————————————————————————————————————————————————————

pub fn render_bool(value: bool) -> String {
    if value { "true".to_owned() } else { "false".to_owned() }
}

/// Shortest decimal that parses back to the same value; whole numbers carry
/// no fractional part (`22.0` → `"22"`).
pub fn render_float(value: f64) -> String {
    value.to_string()
}

// ————————————————————————————————————————————————————————————————————————————
// PARSE
// ————————————————————————————————————————————————————————————————————————————

/// Strict boolean forms: `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool_strict(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Lenient boolean parse: anything that is not a recognised form is `false`.
/// Blank boolean properties are common in stored resource models.
pub fn parse_bool(s: &str) -> bool {
    parse_bool_strict(s).unwrap_or(false)
}

pub fn parse_int(s: &str) -> Result<i64> {
    let wide = parse_int128(s)?;
    i64::try_from(wide).map_err(|_| invalid(ScalarKind::Int, s, "value out of range"))
}

pub fn parse_uint(s: &str) -> Result<u64> {
    let wide = parse_uint128(s)?;
    u64::try_from(wide).map_err(|_| invalid(ScalarKind::Uint, s, "value out of range"))
}

pub fn parse_int128(s: &str) -> Result<i128> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(digits).map_err(|reason| invalid(ScalarKind::Int, s, reason))?;
    if negative {
        if magnitude <= i128::MAX as u128 + 1 {
            Ok((magnitude as i128).wrapping_neg())
        } else {
            Err(invalid(ScalarKind::Int, s, "value out of range"))
        }
    } else {
        i128::try_from(magnitude).map_err(|_| invalid(ScalarKind::Int, s, "value out of range"))
    }
}

pub fn parse_uint128(s: &str) -> Result<u128> {
    let digits = s.strip_prefix('+').unwrap_or(s);
    parse_magnitude(digits).map_err(|reason| invalid(ScalarKind::Uint, s, reason))
}

pub fn parse_float(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|error| invalid(ScalarKind::Float, s, &error.to_string()))
}

/// Integer-literal digits after the sign: `0x`/`0o`/`0b` prefixes, a bare
/// leading `0` for octal, `_` separators only after a prefix.
fn parse_magnitude(digits: &str) -> std::result::Result<u128, &'static str> {
    let (radix, body, prefixed) = match digits.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &digits[2..], true),
        [b'0', b'o' | b'O', ..] => (8, &digits[2..], true),
        [b'0', b'b' | b'B', ..] => (2, &digits[2..], true),
        [b'0', _, ..] => (8, &digits[1..], true),
        _ => (10, digits, false),
    };
    let body = if body.contains('_') {
        if !prefixed || body.ends_with('_') || body.contains("__") {
            return Err("misplaced digit separator");
        }
        body.replace('_', "")
    } else {
        body.to_owned()
    };
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err("invalid digit");
    }
    u128::from_str_radix(&body, radix).map_err(|error| match error.kind() {
        std::num::IntErrorKind::PosOverflow => "value out of range",
        _ => "invalid digit",
    })
}

// ————————————————————————————————————————————————————————————————————————————
// NATIVE NUMBERS
// ————————————————————————————————————————————————————————————————————————————

/// A JSON number into `i64`: integers as is, whole floats narrowed.
pub fn number_to_i64(n: &Number) -> Result<i64> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(invalid(ScalarKind::Int, &n.to_string(), "value out of range"));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(invalid(ScalarKind::Int, &n.to_string(), "not a whole number in range"))
    }
}

pub fn number_to_u64(n: &Number) -> Result<u64> {
    if let Some(u) = n.as_u64() {
        return Ok(u);
    }
    if n.is_i64() {
        return Err(invalid(ScalarKind::Uint, &n.to_string(), "value out of range"));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(invalid(ScalarKind::Uint, &n.to_string(), "not a whole number in range"))
    }
}

pub fn number_to_f64(n: &Number) -> Result<f64> {
    n.as_f64()
        .ok_or_else(|| invalid(ScalarKind::Float, &n.to_string(), "not representable"))
}

fn invalid(kind: ScalarKind, value: &str, reason: &str) -> Error {
    Error::InvalidLeaf { kind, value: value.to_owned(), reason: reason.to_owned() }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
