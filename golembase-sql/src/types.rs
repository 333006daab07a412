use golembase_core::data::{DataType, DecimalOptions, StringOptions};
use golembase_core::err::{DbError, Result};
use sqlparser::ast::{CharacterLength, DataType as AstDataType, ExactNumberInfo};

pub fn sql_type_from_ast(dt: &AstDataType) -> Result<DataType> {
    Ok(match dt {
        AstDataType::TinyInt(_) => DataType::TinyInt,
        AstDataType::SmallInt(_) => DataType::SmallInt,
        AstDataType::Integer(_) => DataType::Integer,
        AstDataType::BigInt(_) => DataType::BigInt,
        AstDataType::Boolean => DataType::Boolean,
        AstDataType::Timestamp(_, _) | AstDataType::Datetime(_) => DataType::DateTime,
        AstDataType::Varchar(len) | AstDataType::CharacterVarying(len) | AstDataType::CharVarying(len) => {
            DataType::Varchar(StringOptions::new(char_len(len)))
        }
        AstDataType::Char(len) | AstDataType::Character(len) => {
            DataType::Char(StringOptions::new(char_len(len)))
        }
        AstDataType::Text | AstDataType::Clob(_) => DataType::Text,
        AstDataType::Decimal(info) | AstDataType::Numeric(info) => {
            let (precision, scale) = precision_scale(info)?;
            DataType::Decimal(DecimalOptions::new(precision, scale))
        }
        AstDataType::Float(_) => DataType::Float,
        AstDataType::Double | AstDataType::DoublePrecision => DataType::Double,
        AstDataType::Real => DataType::Real,
        AstDataType::Blob(_) => DataType::Blob,
        AstDataType::Binary(_) | AstDataType::Varbinary(_) => DataType::VarBinary,
        other => {
            return Err(DbError::not_supported(format!("unsupported column type {other}")));
        }
    })
}

fn char_len(len: &Option<CharacterLength>) -> Option<u32> {
    len.as_ref().map(|l| l.length as u32)
}

fn precision_scale(info: &ExactNumberInfo) -> Result<(u16, u16)> {
    match info {
        ExactNumberInfo::None => Err(DbError::programming(
            "DECIMAL/NUMERIC columns require explicit (precision, scale)",
        )),
        ExactNumberInfo::Precision(p) => Ok((*p as u16, 0)),
        ExactNumberInfo::PrecisionAndScale(p, s) => Ok((*p as u16, *s as u16)),
    }
}
