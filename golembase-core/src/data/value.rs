use serde::{Deserialize, Serialize};

use super::DataType;

/// A typed SQL scalar value (spec §3.2/§4.5). This is what rows are built from and what
/// the codec (§4.1) turns into annotation bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    DateTime(chrono::NaiveDateTime),
    Utf8String(String),
    Decimal(rust_decimal::Decimal),
    Float32(f32),
    Float64(f64),
    Binary(Vec<u8>),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// A best-effort type inferred from the shape of the value alone, used by the
    /// analyzer when type-checking literals before a declared column type is known.
    /// Precision/length options are not recoverable from the value and are left at
    /// their default; callers compare against the catalog's declared type instead.
    pub fn inferred_type(&self) -> Option<DataType> {
        Some(match self {
            DataValue::Null => return None,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::TinyInt(_) => DataType::TinyInt,
            DataValue::SmallInt(_) => DataType::SmallInt,
            DataValue::Integer(_) => DataType::Integer,
            DataValue::BigInt(_) => DataType::BigInt,
            DataValue::DateTime(_) => DataType::DateTime,
            DataValue::Utf8String(_) => DataType::Text,
            DataValue::Decimal(_) => DataType::Decimal(Default::default()),
            DataValue::Float32(_) => DataType::Real,
            DataValue::Float64(_) => DataType::Double,
            DataValue::Binary(_) => DataType::Blob,
        })
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Utf8String(s.to_owned())
    }
}
