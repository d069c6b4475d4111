//! Stream schemas
//!
//! JSON schema model plus the fixed column inventories of the five output
//! streams. Nested source objects are carried as JSON blob columns.

mod streams;
mod types;

pub use streams::{Catalog, CatalogEntry, Stream};
pub use types::{FieldType, JsonSchema, JsonType, SchemaProperty, JSON_MEDIA_TYPE};
