pub mod client;
pub mod entity;
pub mod memory;
pub mod predicate;

pub use client::BackingStore;
pub use entity::{EntityKey, EntityUpdate, NewEntity, QueryMatch, Receipt};
pub use memory::MemoryStore;
