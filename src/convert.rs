//! Cell conversion: ordered, fallible coercion of raw text to typed values.
//!
//! Conversion walks a fixed precedence list and takes the first kind that
//! parses. The unconstrained entry point filters the list through
//! [`TypeMask::DEFAULT`], so a bare `"1"` comes back as an integer rather
//! than a short, and it cannot fail because string is always an acceptable
//! fallback there.

use crate::{
    error::ConversionError,
    kind::{DataKind, TypeMask},
    value::{Value, parse_as},
};

/// Precedence for best-guess conversion. The first kind in this order that
/// parses successfully wins; string is the terminal fallback.
pub const PRECEDENCE: [DataKind; 10] = [
    DataKind::Short,
    DataKind::Integer,
    DataKind::Long,
    DataKind::Float,
    DataKind::Double,
    DataKind::BigInteger,
    DataKind::BigDecimal,
    DataKind::Boolean,
    DataKind::Date,
    DataKind::String,
];

/// Best-guess conversion over the default kind set. Infallible: string is a
/// member of the default set and accepts any text.
pub fn convert_to_object(text: &str) -> Value {
    convert_with_mask(text, TypeMask::DEFAULT)
        .expect("string is in the default mask and always parses")
}

/// Conversion restricted to the kinds present in `allowed`, in precedence
/// order. Fails when no allowed kind parses — including when the caller
/// excluded string.
pub fn convert_with_mask(text: &str, allowed: TypeMask) -> Result<Value, ConversionError> {
    for kind in PRECEDENCE {
        let Some(flag) = kind.flag() else { continue };
        if allowed.intersect(flag).is_empty() {
            continue;
        }
        if let Some(value) = parse_as(kind, text) {
            return Ok(value);
        }
    }
    Err(ConversionError {
        text: text.to_string(),
        allowed,
    })
}

/// The union of every kind `text` parses as. Always includes string.
pub fn get_data_kind(text: &str) -> TypeMask {
    let mut mask = TypeMask::EMPTY;
    for kind in DataKind::CANONICAL {
        if let Some(flag) = kind.flag()
            && parse_as(kind, text).is_some()
        {
            mask = mask.union(flag);
        }
    }
    mask
}
