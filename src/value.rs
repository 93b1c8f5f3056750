//! Typed cell values and the per-kind parse rules behind conversion.
//!
//! Parsing here is deliberately non-raising: a value that does not parse as a
//! given kind yields `None` rather than an error, because "does not parse" is
//! the expected outcome the narrowing algorithm is built on.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use num_bigint::BigInt;

use crate::kind::DataKind;

/// Canonical timestamp rendering and first-choice parse format, e.g.
/// `20241231235959+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%z";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    Date(DateTime<Utc>),
    String(String),
}

impl Value {
    pub fn kind(&self) -> DataKind {
        match self {
            Value::Boolean(_) => DataKind::Boolean,
            Value::Short(_) => DataKind::Short,
            Value::Integer(_) => DataKind::Integer,
            Value::Long(_) => DataKind::Long,
            Value::Float(_) => DataKind::Float,
            Value::Double(_) => DataKind::Double,
            Value::BigInteger(_) => DataKind::BigInteger,
            Value::BigDecimal(_) => DataKind::BigDecimal,
            Value::Date(_) => DataKind::Date,
            Value::String(_) => DataKind::String,
        }
    }

    /// Canonical text rendering. Dates use [`TIMESTAMP_FORMAT`]; everything
    /// else renders in its natural form.
    pub fn render(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Short(v) => v.to_string(),
            Value::Integer(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::BigInteger(v) => v.to_string(),
            Value::BigDecimal(v) => v.to_string(),
            Value::Date(v) => v.format(TIMESTAMP_FORMAT).to_string(),
            Value::String(v) => v.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Attempt to parse `text` as one concrete kind. `None` means the text does
/// not represent that kind; only `SimpleEntityRef` and `Unknown` are
/// categorically unparsable.
pub fn parse_as(kind: DataKind, text: &str) -> Option<Value> {
    match kind {
        DataKind::Boolean => parse_boolean(text).map(Value::Boolean),
        DataKind::Short => text.parse::<i16>().ok().map(Value::Short),
        DataKind::Integer => text.parse::<i32>().ok().map(Value::Integer),
        DataKind::Long => text.parse::<i64>().ok().map(Value::Long),
        DataKind::Float => parse_float(text).map(Value::Float),
        DataKind::Double => parse_double(text).map(Value::Double),
        DataKind::BigInteger => text.parse::<BigInt>().ok().map(Value::BigInteger),
        DataKind::BigDecimal => text.parse::<BigDecimal>().ok().map(Value::BigDecimal),
        DataKind::Date => parse_timestamp(text).map(Value::Date),
        DataKind::String => Some(Value::String(text.to_string())),
        DataKind::SimpleEntityRef | DataKind::Unknown => None,
    }
}

fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// Overflow to infinity (and NaN) counts as a parse failure for the binary
// float kinds; the value may still land in big-decimal.
fn parse_float(text: &str) -> Option<f32> {
    text.parse::<f32>().ok().filter(|parsed| parsed.is_finite())
}

fn parse_double(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Timestamp parsing: the canonical zone-qualified format first, then the
/// permissive date-time and date format lists.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(zoned) = DateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        return Some(zoned.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}
