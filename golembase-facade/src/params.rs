//! Connection-string parsing (spec §6.2). Format is `key=value` pairs separated by
//! `;`, e.g. `rpc_url=https://...;ws_url=wss://...;private_key=0xabc;app_id=acme;
//! schema_id=acme_main`. All five parameters are required.

use std::collections::HashMap;

use golembase_core::err::{DbError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParams {
    pub rpc_url: String,
    pub ws_url: String,
    pub private_key: String,
    pub app_id: String,
    pub schema_id: String,
}

impl ConnectionParams {
    pub fn parse(conn_str: &str) -> Result<Self> {
        let mut fields = HashMap::new();
        for pair in conn_str.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                DbError::interface(format!("malformed connection-string segment '{pair}'"))
            })?;
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }

        let required = |name: &str| -> Result<String> {
            fields
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| DbError::interface(format!("connection string is missing required parameter '{name}'")))
        };

        Ok(Self {
            rpc_url: required("rpc_url")?,
            ws_url: required("ws_url")?,
            private_key: required("private_key")?,
            app_id: required("app_id")?,
            schema_id: required("schema_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_required_fields() {
        let params = ConnectionParams::parse(
            "rpc_url=https://rpc.example;ws_url=wss://rpc.example;private_key=0xabc;app_id=acme;schema_id=acme_main",
        )
        .unwrap();
        assert_eq!(params.app_id, "acme");
        assert_eq!(params.schema_id, "acme_main");
    }

    #[test]
    fn missing_field_is_interface_error() {
        let err = ConnectionParams::parse("rpc_url=https://rpc.example;app_id=acme").unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Interface(_))));
    }
}
