//! Fixed-width numeric kinds.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fixed-width numeric kind supported by the typed retrieval layer.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// Signed 8-bit integer.
    #[display("int8")]
    Int8,
    /// Unsigned 8-bit integer.
    #[display("uint8")]
    UInt8,
    /// Signed 16-bit integer.
    #[display("int16")]
    Int16,
    /// Unsigned 16-bit integer.
    #[display("uint16")]
    UInt16,
    /// Signed 32-bit integer.
    #[display("int32")]
    Int32,
    /// Unsigned 32-bit integer.
    #[display("uint32")]
    UInt32,
    /// Signed 64-bit integer.
    #[display("int64")]
    Int64,
    /// Unsigned 64-bit integer.
    #[display("uint64")]
    UInt64,
    /// IEEE 754 single precision float.
    #[display("float32")]
    Float32,
    /// IEEE 754 double precision float.
    #[display("float64")]
    Float64,
}

/// An unknown or unsupported numeric kind name error.
#[derive(Clone, Debug, Error)]
#[error("unknown numeric kind {0:?}")]
pub struct UnknownNumericKindError(String);

impl UnknownNumericKindError {
    /// Create a new unknown numeric kind error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl NumericKind {
    /// All numeric kinds.
    pub const ALL: [NumericKind; 10] = [
        NumericKind::Int8,
        NumericKind::UInt8,
        NumericKind::Int16,
        NumericKind::UInt16,
        NumericKind::Int32,
        NumericKind::UInt32,
        NumericKind::Int64,
        NumericKind::UInt64,
        NumericKind::Float32,
        NumericKind::Float64,
    ];

    /// The size in bytes of one sample of this kind.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            NumericKind::Int8 | NumericKind::UInt8 => 1,
            NumericKind::Int16 | NumericKind::UInt16 => 2,
            NumericKind::Int32 | NumericKind::UInt32 | NumericKind::Float32 => 4,
            NumericKind::Int64 | NumericKind::UInt64 | NumericKind::Float64 => 8,
        }
    }

    /// Returns true for the floating point kinds.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, NumericKind::Float32 | NumericKind::Float64)
    }
}

impl FromStr for NumericKind {
    type Err = UnknownNumericKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int8" => Ok(NumericKind::Int8),
            "uint8" => Ok(NumericKind::UInt8),
            "int16" => Ok(NumericKind::Int16),
            "uint16" => Ok(NumericKind::UInt16),
            "int32" => Ok(NumericKind::Int32),
            "uint32" => Ok(NumericKind::UInt32),
            "int64" => Ok(NumericKind::Int64),
            "uint64" => Ok(NumericKind::UInt64),
            "float32" => Ok(NumericKind::Float32),
            "float64" => Ok(NumericKind::Float64),
            _ => Err(UnknownNumericKindError(s.to_string())),
        }
    }
}
