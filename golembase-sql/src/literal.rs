use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlparser::ast::Value as AstValue;

use golembase_core::data::{DataType, DataValue};
use golembase_core::err::{DbError, Result};

/// Converts a parsed SQL literal into a typed [`DataValue`]. `expected` is the
/// declared type of the column this literal is being compared against or inserted
/// into, when known; it drives how ambiguous literal forms (numbers, quoted date
/// strings) are interpreted (spec §9: "type-check against the catalog at the
/// analyzer, erroring early").
pub fn value_from_ast(v: &AstValue, expected: Option<&DataType>) -> Result<DataValue> {
    match v {
        AstValue::Null => Ok(DataValue::Null),
        AstValue::Boolean(b) => Ok(DataValue::Boolean(*b)),
        AstValue::SingleQuotedString(s) | AstValue::DoubleQuotedString(s) => string_literal(s, expected),
        AstValue::Number(s, _) => number_literal(s, expected),
        other => Err(DbError::not_supported(format!("unsupported literal {other}"))),
    }
}

fn string_literal(s: &str, expected: Option<&DataType>) -> Result<DataValue> {
    match expected {
        Some(DataType::DateTime) => {
            let dt = parse_datetime(s)?;
            Ok(DataValue::DateTime(dt))
        }
        Some(DataType::Decimal(_)) => {
            let d: Decimal = s
                .parse()
                .map_err(|_| DbError::data(format!("'{s}' is not a valid DECIMAL literal")))?;
            Ok(DataValue::Decimal(d))
        }
        _ => Ok(DataValue::Utf8String(s.to_string())),
    }
}

fn number_literal(s: &str, expected: Option<&DataType>) -> Result<DataValue> {
    match expected {
        Some(DataType::TinyInt) => Ok(DataValue::TinyInt(parse_int(s)?)),
        Some(DataType::SmallInt) => Ok(DataValue::SmallInt(parse_int(s)?)),
        Some(DataType::Integer) => Ok(DataValue::Integer(parse_int(s)?)),
        Some(DataType::BigInt) => Ok(DataValue::BigInt(parse_int(s)?)),
        Some(DataType::Boolean) => Ok(DataValue::Boolean(s != "0")),
        Some(DataType::Float) => Ok(DataValue::Float32(parse_float(s)?)),
        Some(DataType::Double) | Some(DataType::Real) => Ok(DataValue::Float64(parse_float(s)?)),
        Some(DataType::Decimal(_)) => {
            let d: Decimal = s
                .parse()
                .map_err(|_| DbError::data(format!("'{s}' is not a valid DECIMAL literal")))?;
            Ok(DataValue::Decimal(d))
        }
        _ if s.contains('.') => {
            let d: Decimal = s
                .parse()
                .map_err(|_| DbError::data(format!("'{s}' is not a valid numeric literal")))?;
            Ok(DataValue::Decimal(d))
        }
        _ => Ok(DataValue::BigInt(parse_int(s)?)),
    }
}

fn parse_int<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.parse()
        .map_err(|_| DbError::data(format!("'{s}' is out of range for its declared integer type")))
}

fn parse_float<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.parse().map_err(|_| DbError::data(format!("'{s}' is not a valid floating-point literal")))
}

/// Accepts `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`, the two forms a caller
/// binding a DATETIME column as a string literal would realistically send.
fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| DbError::data(format!("'{s}' is not a valid DATETIME literal")))
}
