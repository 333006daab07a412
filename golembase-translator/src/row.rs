//! Row encode/decode between the analyzer's typed values and the payload's canonical
//! JSON form (spec §3.3/§4.5). The payload is the source of truth; annotations are a
//! derived index and are never read back on decode.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::{Map, Value as Json};
use std::str::FromStr;

use golembase_core::data::{DataType, DataValue};
use golembase_core::err::{DbError, Result};

/// A decoded row: column name to value, in table-column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<(String, DataValue)>);

impl Row {
    pub fn get(&self, column: &str) -> Option<&DataValue> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Encodes one typed value to its canonical JSON cell (spec §3.3's payload form).
pub fn encode_value_json(value: &DataValue) -> Json {
    match value {
        DataValue::Null => Json::Null,
        DataValue::Boolean(b) => Json::Bool(*b),
        DataValue::TinyInt(v) => Json::from(*v),
        DataValue::SmallInt(v) => Json::from(*v),
        DataValue::Integer(v) => Json::from(*v),
        DataValue::BigInt(v) => Json::from(*v),
        DataValue::DateTime(dt) => Json::String(dt.format(DATETIME_FORMAT).to_string()),
        DataValue::Utf8String(s) => Json::String(s.clone()),
        DataValue::Decimal(d) => Json::String(d.to_string()),
        DataValue::Float32(f) => json_number_or_null(*f as f64),
        DataValue::Float64(f) => json_number_or_null(*f),
        DataValue::Binary(bytes) => Json::String(hex_encode(bytes)),
    }
}

fn json_number_or_null(f: f64) -> Json {
    serde_json::Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null)
}

/// Decodes one JSON payload cell back to a typed value, type-checked against the
/// column's declared type. A missing cell (absent key) is always NULL — handled by the
/// caller before this is reached.
pub fn decode_value_json(json: &Json, sql_type: &DataType) -> Result<DataValue> {
    if json.is_null() {
        return Ok(DataValue::Null);
    }
    Ok(match sql_type {
        DataType::Boolean => DataValue::Boolean(
            json.as_bool()
                .ok_or_else(|| DbError::data("payload cell is not a boolean"))?,
        ),
        DataType::TinyInt => DataValue::TinyInt(json_i64(json)?.try_into().map_err(|_| {
            DbError::data("payload cell out of range for TINYINT")
        })?),
        DataType::SmallInt => DataValue::SmallInt(json_i64(json)?.try_into().map_err(|_| {
            DbError::data("payload cell out of range for SMALLINT")
        })?),
        DataType::Integer => DataValue::Integer(json_i64(json)?.try_into().map_err(|_| {
            DbError::data("payload cell out of range for INTEGER")
        })?),
        DataType::BigInt => DataValue::BigInt(json_i64(json)?),
        DataType::DateTime => {
            let s = json
                .as_str()
                .ok_or_else(|| DbError::data("payload cell is not a DATETIME string"))?;
            DataValue::DateTime(
                NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                    .map_err(|_| DbError::data(format!("malformed DATETIME payload cell '{s}'")))?,
            )
        }
        DataType::Varchar(_) | DataType::Char(_) | DataType::Text => DataValue::Utf8String(
            json.as_str()
                .ok_or_else(|| DbError::data("payload cell is not a string"))?
                .to_owned(),
        ),
        DataType::Decimal(_) => {
            let s = json
                .as_str()
                .ok_or_else(|| DbError::data("payload cell is not a DECIMAL string"))?;
            DataValue::Decimal(
                Decimal::from_str(s).map_err(|_| DbError::data(format!("malformed DECIMAL payload cell '{s}'")))?,
            )
        }
        DataType::Float | DataType::Real => DataValue::Float32(
            json.as_f64()
                .ok_or_else(|| DbError::data("payload cell is not a number"))? as f32,
        ),
        DataType::Double => DataValue::Float64(
            json.as_f64()
                .ok_or_else(|| DbError::data("payload cell is not a number"))?,
        ),
        DataType::Blob | DataType::VarBinary => {
            let s = json
                .as_str()
                .ok_or_else(|| DbError::data("payload cell is not a binary string"))?;
            DataValue::Binary(hex_decode(s)?)
        }
    })
}

fn json_i64(json: &Json) -> Result<i64> {
    json.as_i64().ok_or_else(|| DbError::data("payload cell is not an integer"))
}

/// Builds the payload JSON object from a fully-resolved row (spec §3.3: keys are
/// exactly the table's column names).
pub fn encode_payload(values: &[(String, DataValue)]) -> Vec<u8> {
    let mut obj = Map::with_capacity(values.len());
    for (name, value) in values {
        obj.insert(name.clone(), encode_value_json(value));
    }
    serde_json::to_vec(&Json::Object(obj)).expect("JSON object serialization cannot fail")
}

/// Decodes a payload back into a [`Row`], in the given column order. Columns absent
/// from the payload are NULL (spec §3.3); columns present with the wrong JSON shape
/// are a `DataError`.
pub fn decode_payload(payload: &[u8], columns: &[golembase_plan::ColumnDef]) -> Result<Row> {
    let json: Json = serde_json::from_slice(payload)
        .map_err(|e| DbError::internal(format!("malformed row payload: {e}")))?;
    let obj = json
        .as_object()
        .ok_or_else(|| DbError::internal("row payload is not a JSON object"))?;

    let mut row = Vec::with_capacity(columns.len());
    for col in columns {
        let value = match obj.get(&col.name) {
            Some(cell) => decode_value_json(cell, &col.sql_type)?,
            None => DataValue::Null,
        };
        row.push((col.name.clone(), value));
    }
    Ok(Row(row))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>> {
    if !s.len().is_multiple_of(2) {
        return Err(DbError::data("malformed binary payload cell"));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| DbError::data("malformed binary payload cell")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_core::data::{DecimalOptions, StringOptions};
    use golembase_plan::ColumnDef;

    fn col(name: &str, ty: DataType) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            sql_type: ty,
            nullable: true,
            default: None,
            indexed: false,
            primary_key: false,
        }
    }

    #[test]
    fn round_trips_every_scalar_type() {
        let columns = vec![
            col("a", DataType::Integer),
            col("b", DataType::Text),
            col("c", DataType::Decimal(DecimalOptions::new(6, 2))),
            col("d", DataType::Boolean),
            col("e", DataType::Blob),
            col("f", DataType::Varchar(StringOptions::new(Some(10)))),
        ];
        let values = vec![
            ("a".to_string(), DataValue::Integer(42)),
            ("b".to_string(), DataValue::Utf8String("hi".into())),
            ("c".to_string(), DataValue::Decimal(Decimal::from_str("10.50").unwrap())),
            ("d".to_string(), DataValue::Boolean(true)),
            ("e".to_string(), DataValue::Binary(vec![0xde, 0xad])),
            ("f".to_string(), DataValue::Utf8String("short".into())),
        ];
        let payload = encode_payload(&values);
        let row = decode_payload(&payload, &columns).unwrap();
        for (name, value) in &values {
            assert_eq!(row.get(name).unwrap(), value);
        }
    }

    #[test]
    fn missing_key_decodes_as_null() {
        let columns = vec![col("a", DataType::Integer)];
        let row = decode_payload(b"{}", &columns).unwrap();
        assert_eq!(row.get("a").unwrap(), &DataValue::Null);
    }

    #[test]
    fn wrong_shape_is_data_error() {
        let columns = vec![col("a", DataType::Integer)];
        let err = decode_payload(br#"{"a":"not a number"}"#, &columns).unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Data(_))));
    }
}
