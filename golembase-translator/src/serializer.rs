//! Builds and reads the backing-store entity for a row (spec §3.3/§4.5): the payload
//! is canonical, the annotations are a derived index over it.

use std::collections::HashMap;

use golembase_catalog::Table;
use golembase_core::data::codec;
use golembase_core::data::DataValue;
use golembase_core::err::Result;
use golembase_store::NewEntity;

use crate::row::{decode_payload, encode_payload, Row};

pub const ROW_TYPE: &str = "json";

pub fn relation(app_id: &str, table_name: &str) -> String {
    format!("{app_id}.{table_name}")
}

/// Assembles the entity for one row: payload plus the `idx_<col>` annotations for
/// every indexed, non-null column (spec §3.3's invariant — absent ⇒ null).
pub fn encode_entity(
    table: &Table,
    app_id: &str,
    table_name: &str,
    values: &[(String, DataValue)],
) -> Result<NewEntity> {
    let mut string_annotations = HashMap::new();
    let mut numeric_annotations = HashMap::new();
    string_annotations.insert("row_type".to_string(), ROW_TYPE.to_string());
    string_annotations.insert("relation".to_string(), relation(app_id, table_name));

    for (name, value) in values {
        if value.is_null() {
            continue;
        }
        let Some(col) = table.column(name) else {
            continue;
        };
        if !table.is_indexed(name) {
            continue;
        }
        if col.sql_type.is_numeric_annotation() {
            numeric_annotations.insert(format!("idx_{name}"), codec::encode_annotation_u64(value, &col.sql_type)?);
        } else if let Some(s) = codec::encode_annotation_string(value, &col.sql_type)? {
            string_annotations.insert(format!("idx_{name}"), s);
        }
    }

    Ok(NewEntity {
        payload: encode_payload(values),
        btl: table.entity_ttl,
        string_annotations,
        numeric_annotations,
    })
}

pub fn decode_row(table: &Table, payload: &[u8]) -> Result<Row> {
    decode_payload(payload, &table.columns)
}
