use serde::{Deserialize, Serialize};

/// SQL scalar type of a column (spec §3.2).
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DataType {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Boolean,
    DateTime,
    Varchar(StringOptions),
    Char(StringOptions),
    Text,
    Decimal(DecimalOptions),
    Float,
    Double,
    Real,
    Blob,
    VarBinary,
}

impl DataType {
    /// Whether this type's values can be represented as a backing-store annotation at all.
    /// FLOAT/DOUBLE/REAL/BLOB/VARBINARY live in the payload only (spec §4.1.6).
    pub fn is_indexable_type(&self) -> bool {
        !matches!(
            self,
            DataType::Float | DataType::Double | DataType::Real | DataType::Blob | DataType::VarBinary
        )
    }

    /// Whether indexed values of this type are carried as a numeric (u64) annotation,
    /// as opposed to a string annotation.
    pub fn is_numeric_annotation(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::Integer
                | DataType::BigInt
                | DataType::Boolean
                | DataType::DateTime
        )
    }

    /// Bit width of the integer encoding used by [`crate::data::codec`], if this is an
    /// integer type.
    pub fn int_width(&self) -> Option<u8> {
        match self {
            DataType::TinyInt => Some(8),
            DataType::SmallInt => Some(16),
            DataType::Integer => Some(32),
            DataType::BigInt => Some(64),
            _ => None,
        }
    }
}

/// Options for VARCHAR/CHAR columns: `length` is the declared max length in characters.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct StringOptions {
    pub length: Option<u32>,
}

impl StringOptions {
    pub fn new(length: Option<u32>) -> Self {
        Self { length }
    }
}

/// Options for DECIMAL(p,s)/NUMERIC(p,s) columns.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct DecimalOptions {
    pub precision: u16,
    pub scale: u16,
}

impl DecimalOptions {
    pub fn new(precision: u16, scale: u16) -> Self {
        Self { precision, scale }
    }

    /// Number of digits before the decimal point.
    pub fn int_digits(&self) -> u16 {
        self.precision.saturating_sub(self.scale)
    }
}
