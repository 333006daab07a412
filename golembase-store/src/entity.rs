use std::collections::HashMap;

/// Opaque entity key, as returned by `create_entities`/`update_entities` and accepted
/// by `delete_entities` (spec §6.1). The backing store controls its shape; callers
/// treat it as an opaque byte string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(pub Vec<u8>);

impl EntityKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex_encode(&self.0))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A new entity to be written: payload bytes, block time-to-live, and the two
/// annotation maps (spec §3.3/§6.1).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEntity {
    pub payload: Vec<u8>,
    pub btl: u64,
    pub string_annotations: HashMap<String, String>,
    pub numeric_annotations: HashMap<String, u64>,
}

/// A replace-in-place write targeting an existing key, re-applying the BTL (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityUpdate {
    pub key: EntityKey,
    pub entity: NewEntity,
}

/// Acknowledgement of a successful create/update/delete (spec §6.1).
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub entity_key: EntityKey,
    pub expiration_block: u64,
}

/// A single match returned by `query_entities` (spec §6.1). Only the payload is
/// returned; annotations are not echoed back since the serializer treats the payload
/// as canonical (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch {
    pub entity_key: EntityKey,
    pub storage_value: Vec<u8>,
}
