//! Archive property assignment during creation.
//!
//! Properties arrive as loosely-typed strings. Each value is tried, in order,
//! as an integer, as a boolean, and finally kept as a string; the first parse
//! that succeeds decides which codec setter receives it. A value that reads
//! as `1` or `on` is therefore never passed as a string.

use crate::codec::CodecWriter;

/// The type a property value string was inferred as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValueHint {
    /// Decimal (or `0x` hexadecimal) integer.
    Int(i64),
    /// `true`/`false`, `yes`/`no`, `on`/`off` (any case).
    Bool(bool),
    /// Anything else.
    Str(String),
}

impl PropertyValueHint {
    /// Infers the type of `value`.
    pub fn infer(value: &str) -> Self {
        if let Some(n) = parse_int(value) {
            Self::Int(n)
        } else if let Some(b) = parse_bool(value) {
            Self::Bool(b)
        } else {
            Self::Str(value.to_string())
        }
    }
}

fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value)),
    };
    let (radix, digits) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // the sign stays attached so i64::MIN parses
    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Applies properties to a writer.
///
/// A property the codec rejects is logged and skipped; the remaining
/// properties are still applied.
pub(crate) fn apply_properties(writer: &mut dyn CodecWriter, properties: &[(String, String)]) {
    for (name, raw) in properties {
        let hint = PropertyValueHint::infer(raw);
        let result = match &hint {
            PropertyValueHint::Int(n) => writer.set_int_property(name, *n),
            PropertyValueHint::Bool(b) => writer.set_bool_property(name, *b),
            PropertyValueHint::Str(s) => writer.set_string_property(name, s),
        };
        match result {
            Ok(()) => log::debug!("set archive property {}={:?}", name, hint),
            Err(e) => log::warn!("Failed to set archive property '{}': {}", name, e),
        }
    }
}
