//! Data-kind catalog: bit-flagged scalar kinds, masks, and measurement scales.
//!
//! [`DataKind`] enumerates the scalar kinds a cell's text may represent. Each
//! concrete kind owns exactly one bit so that a set of kinds ([`TypeMask`])
//! can be stored, combined, and persisted as a single integer. The bit
//! assignments are a stability contract: callers may persist a raw mask and
//! re-interpret it against this table, so bits are never reassigned.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const BOOLEAN_BIT: u32 = 1 << 0;
const SHORT_BIT: u32 = 1 << 1;
const INTEGER_BIT: u32 = 1 << 2;
const LONG_BIT: u32 = 1 << 3;
const FLOAT_BIT: u32 = 1 << 4;
const DOUBLE_BIT: u32 = 1 << 5;
const BIG_INTEGER_BIT: u32 = 1 << 6;
const BIG_DECIMAL_BIT: u32 = 1 << 7;
const DATE_BIT: u32 = 1 << 8;
const STRING_BIT: u32 = 1 << 9;

/// One concrete scalar kind a cell's text may represent, plus the two
/// non-parsable members of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Boolean,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Date,
    String,
    /// Reference to an externally modeled entity. Owns no bit and never
    /// results from parsing text.
    SimpleEntityRef,
    /// Sentinel for a column whose possible-kind mask is empty.
    Unknown,
}

impl DataKind {
    /// Decomposition and default-selection order. Masks list their members in
    /// this order, and the first member of a column's final mask becomes the
    /// column's chosen kind.
    pub const CANONICAL: [DataKind; 10] = [
        DataKind::Boolean,
        DataKind::Short,
        DataKind::Integer,
        DataKind::Long,
        DataKind::Float,
        DataKind::Double,
        DataKind::BigInteger,
        DataKind::BigDecimal,
        DataKind::Date,
        DataKind::String,
    ];

    /// The single-bit mask for a concrete kind; `None` for the members that
    /// own no bit (`SimpleEntityRef`, `Unknown`).
    pub fn flag(self) -> Option<TypeMask> {
        let bit = match self {
            DataKind::Boolean => BOOLEAN_BIT,
            DataKind::Short => SHORT_BIT,
            DataKind::Integer => INTEGER_BIT,
            DataKind::Long => LONG_BIT,
            DataKind::Float => FLOAT_BIT,
            DataKind::Double => DOUBLE_BIT,
            DataKind::BigInteger => BIG_INTEGER_BIT,
            DataKind::BigDecimal => BIG_DECIMAL_BIT,
            DataKind::Date => DATE_BIT,
            DataKind::String => STRING_BIT,
            DataKind::SimpleEntityRef | DataKind::Unknown => return None,
        };
        Some(TypeMask(bit))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Boolean => "boolean",
            DataKind::Short => "short",
            DataKind::Integer => "integer",
            DataKind::Long => "long",
            DataKind::Float => "float",
            DataKind::Double => "double",
            DataKind::BigInteger => "big-integer",
            DataKind::BigDecimal => "big-decimal",
            DataKind::Date => "date",
            DataKind::String => "string",
            DataKind::SimpleEntityRef => "entity",
            DataKind::Unknown => "unknown",
        }
    }

    /// Two-letter code used in compact mask renderings.
    pub fn code(self) -> &'static str {
        match self {
            DataKind::Boolean => "bl",
            DataKind::Short => "sh",
            DataKind::Integer => "in",
            DataKind::Long => "lo",
            DataKind::Float => "fl",
            DataKind::Double => "db",
            DataKind::BigInteger => "bi",
            DataKind::BigDecimal => "bd",
            DataKind::Date => "dt",
            DataKind::String => "st",
            DataKind::SimpleEntityRef => "en",
            DataKind::Unknown => "uk",
        }
    }

    /// Measurement scales valid for this kind, in preference order. The first
    /// entry is the default chosen alongside the kind.
    pub fn allowed_scales(self) -> &'static [ScaleKind] {
        match self {
            DataKind::Float | DataKind::Double | DataKind::BigDecimal => &[
                ScaleKind::Ratio,
                ScaleKind::Interval,
                ScaleKind::Ordinal,
                ScaleKind::Nominal,
            ],
            DataKind::Short | DataKind::Integer | DataKind::Long | DataKind::BigInteger => {
                &[ScaleKind::Interval, ScaleKind::Ordinal, ScaleKind::Nominal]
            }
            DataKind::Unknown => &[ScaleKind::None],
            _ => &[ScaleKind::Nominal],
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "boolean" | "bool" | "bl" => Ok(DataKind::Boolean),
            "short" | "sh" => Ok(DataKind::Short),
            "integer" | "int" | "in" => Ok(DataKind::Integer),
            "long" | "lo" => Ok(DataKind::Long),
            "float" | "fl" => Ok(DataKind::Float),
            "double" | "db" => Ok(DataKind::Double),
            "big-integer" | "bigint" | "bi" => Ok(DataKind::BigInteger),
            "big-decimal" | "bigdec" | "bd" => Ok(DataKind::BigDecimal),
            "date" | "dt" => Ok(DataKind::Date),
            "string" | "st" => Ok(DataKind::String),
            "entity" | "en" => Ok(DataKind::SimpleEntityRef),
            "unknown" | "uk" => Ok(DataKind::Unknown),
            _ => Err(anyhow!("Unknown data kind '{value}'")),
        }
    }
}

impl Serialize for DataKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        DataKind::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// A set of [`DataKind`] values encoded as independent bit flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeMask(u32);

impl TypeMask {
    pub const EMPTY: TypeMask = TypeMask(0);
    /// Every concrete kind.
    pub const ALL: TypeMask = TypeMask(
        BOOLEAN_BIT
            | SHORT_BIT
            | INTEGER_BIT
            | LONG_BIT
            | FLOAT_BIT
            | DOUBLE_BIT
            | BIG_INTEGER_BIT
            | BIG_DECIMAL_BIT
            | DATE_BIT
            | STRING_BIT,
    );
    pub const NUMERIC: TypeMask = TypeMask(
        SHORT_BIT
            | INTEGER_BIT
            | LONG_BIT
            | FLOAT_BIT
            | DOUBLE_BIT
            | BIG_INTEGER_BIT
            | BIG_DECIMAL_BIT,
    );
    pub const INTEGRAL: TypeMask = TypeMask(SHORT_BIT | INTEGER_BIT | LONG_BIT | BIG_INTEGER_BIT);
    pub const REAL: TypeMask = TypeMask(FLOAT_BIT | DOUBLE_BIT | BIG_DECIMAL_BIT);
    /// The kinds exposed by unconstrained best-guess conversion.
    pub const DEFAULT: TypeMask =
        TypeMask(BOOLEAN_BIT | INTEGER_BIT | DOUBLE_BIT | STRING_BIT | DATE_BIT);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Re-constitute a persisted mask. Bits outside the catalog are dropped.
    pub const fn from_bits(bits: u32) -> TypeMask {
        TypeMask(bits & TypeMask::ALL.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: TypeMask) -> TypeMask {
        TypeMask(self.0 | other.0)
    }

    pub const fn intersect(self, other: TypeMask) -> TypeMask {
        TypeMask(self.0 & other.0)
    }

    pub fn contains(self, kind: DataKind) -> bool {
        kind.flag()
            .is_some_and(|flag| self.0 & flag.0 == flag.0)
    }

    pub const fn contains_all(self, other: TypeMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Member kinds in canonical order.
    pub fn kinds(self) -> Vec<DataKind> {
        DataKind::CANONICAL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// The default-selection rule: the first member in canonical order, or
    /// [`DataKind::Unknown`] when the mask is empty.
    pub fn first_kind(self) -> DataKind {
        self.kinds().first().copied().unwrap_or(DataKind::Unknown)
    }
}

impl std::ops::BitOr for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: TypeMask) -> TypeMask {
        self.union(rhs)
    }
}

impl std::ops::BitAnd for TypeMask {
    type Output = TypeMask;

    fn bitand(self, rhs: TypeMask) -> TypeMask {
        self.intersect(rhs)
    }
}

impl From<DataKind> for TypeMask {
    fn from(kind: DataKind) -> TypeMask {
        kind.flag().unwrap_or(TypeMask::EMPTY)
    }
}

impl fmt::Display for TypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.kinds().iter().map(|kind| kind.as_str()).join("|"))
    }
}

impl Serialize for TypeMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for TypeMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(TypeMask::from_bits(bits))
    }
}

/// Qualitative measurement scale associated with a chosen [`DataKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    Nominal,
    Ordinal,
    Interval,
    Ratio,
    None,
}

impl ScaleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleKind::Nominal => "nominal",
            ScaleKind::Ordinal => "ordinal",
            ScaleKind::Interval => "interval",
            ScaleKind::Ratio => "ratio",
            ScaleKind::None => "none",
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScaleKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nominal" => Ok(ScaleKind::Nominal),
            "ordinal" => Ok(ScaleKind::Ordinal),
            "interval" => Ok(ScaleKind::Interval),
            "ratio" => Ok(ScaleKind::Ratio),
            "none" => Ok(ScaleKind::None),
            _ => Err(anyhow!("Unknown scale kind '{value}'")),
        }
    }
}

impl Serialize for ScaleKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScaleKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ScaleKind::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_assignments_are_stable() {
        assert_eq!(DataKind::Boolean.flag().unwrap().bits(), 1);
        assert_eq!(DataKind::Short.flag().unwrap().bits(), 2);
        assert_eq!(DataKind::Integer.flag().unwrap().bits(), 4);
        assert_eq!(DataKind::Long.flag().unwrap().bits(), 8);
        assert_eq!(DataKind::Float.flag().unwrap().bits(), 16);
        assert_eq!(DataKind::Double.flag().unwrap().bits(), 32);
        assert_eq!(DataKind::BigInteger.flag().unwrap().bits(), 64);
        assert_eq!(DataKind::BigDecimal.flag().unwrap().bits(), 128);
        assert_eq!(DataKind::Date.flag().unwrap().bits(), 256);
        assert_eq!(DataKind::String.flag().unwrap().bits(), 512);
    }

    #[test]
    fn entity_and_unknown_own_no_bit() {
        assert!(DataKind::SimpleEntityRef.flag().is_none());
        assert!(DataKind::Unknown.flag().is_none());
    }

    #[test]
    fn named_unions_cover_expected_members() {
        assert_eq!(
            TypeMask::INTEGRAL.kinds(),
            vec![
                DataKind::Short,
                DataKind::Integer,
                DataKind::Long,
                DataKind::BigInteger
            ]
        );
        assert_eq!(
            TypeMask::REAL.kinds(),
            vec![DataKind::Float, DataKind::Double, DataKind::BigDecimal]
        );
        assert!(TypeMask::NUMERIC.contains_all(TypeMask::INTEGRAL));
        assert!(TypeMask::NUMERIC.contains_all(TypeMask::REAL));
        assert!(!TypeMask::NUMERIC.contains(DataKind::Boolean));
        assert!(TypeMask::DEFAULT.contains(DataKind::String));
    }

    #[test]
    fn kinds_decompose_in_canonical_order() {
        let mask = TypeMask::from(DataKind::String)
            | TypeMask::from(DataKind::Boolean)
            | TypeMask::from(DataKind::Double);
        assert_eq!(
            mask.kinds(),
            vec![DataKind::Boolean, DataKind::Double, DataKind::String]
        );
        assert_eq!(mask.first_kind(), DataKind::Boolean);
        assert_eq!(TypeMask::EMPTY.first_kind(), DataKind::Unknown);
    }

    #[test]
    fn from_bits_drops_unassigned_bits() {
        let mask = TypeMask::from_bits(0xFFFF_FFFF);
        assert_eq!(mask, TypeMask::ALL);
    }

    #[test]
    fn allowed_scales_follow_kind_family() {
        assert_eq!(DataKind::Boolean.allowed_scales(), &[ScaleKind::Nominal]);
        assert_eq!(DataKind::Date.allowed_scales(), &[ScaleKind::Nominal]);
        assert_eq!(
            DataKind::Double.allowed_scales().first(),
            Some(&ScaleKind::Ratio)
        );
        assert_eq!(
            DataKind::Long.allowed_scales().first(),
            Some(&ScaleKind::Interval)
        );
        assert_eq!(DataKind::Unknown.allowed_scales(), &[ScaleKind::None]);
    }

    #[test]
    fn kind_tokens_round_trip() {
        for kind in DataKind::CANONICAL {
            assert_eq!(kind.as_str().parse::<DataKind>().unwrap(), kind);
            assert_eq!(kind.code().parse::<DataKind>().unwrap(), kind);
        }
        assert!("galaxy".parse::<DataKind>().is_err());
    }

    #[test]
    fn mask_display_joins_member_names() {
        let mask = TypeMask::from(DataKind::Integer) | TypeMask::from(DataKind::String);
        assert_eq!(mask.to_string(), "integer|string");
        assert_eq!(TypeMask::EMPTY.to_string(), "none");
    }
}
