//! Record flattening
//!
//! Converts nested Porter JSON objects into single-level rows of scalar
//! fields.
//!
//! # Rules
//!
//! - Identifiers come from the trailing path segment of `rel == "self"`
//!   links; a missing or malformed link yields 0.
//! - Every optional sub-object is kept verbatim as a `<name>_json` string
//!   and its scalar sub-fields are coerced to `int`/`float`/`string`.
//!   An absent sub-object becomes `{}` and all derived scalars are zero.
//! - The whole source object is kept as a `_json` field as well.
//! - Review titles and bodies are stripped of CR/LF and have `\` and `"` escaped.

mod fields;
mod links;
mod records;

pub use fields::{
    field, sanitize_text, to_float, to_int, to_json_blob, to_text, SubObject, EMPTY_JSON,
};
pub use links::{find_link, parse_id, parse_snapshot_window, resolve, LinkKind, LinkRef};
pub use records::{
    flatten_hotel, flatten_review, flatten_snapshot, flatten_snapshot_by_site,
    flatten_snapshot_by_time, snapshot_children, SnapshotContext,
};

#[cfg(test)]
mod tests;
