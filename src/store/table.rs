//! Table documents and the table-file wire codec
//!
//! A table file is NOT valid standalone JSON. It is the serialization of
//! `{"metaData":{...},"<key1>":record1,...}` with the outer `{` and `}`
//! stripped before writing, so the literal file bytes are the comma-joined
//! `"key":value` pairs. Readers re-wrap the content in braces before
//! parsing. This format is preserved byte-compatibly for interoperability
//! with existing files.
//!
//! ```text
//! file bytes:   "metaData":{"tableName":"t",...},"1":{"id":"1",...}
//! parsed as:   {"metaData":{"tableName":"t",...},"1":{"id":"1",...}}
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TestDbError};

use super::column::ColumnDescriptor;

/// Reserved key holding the metadata block inside a table file.
///
/// Record keys may never collide with this; inserts reject it.
pub const META_KEY: &str = "metaData";

/// A plain JSON-compatible record: string keys to JSON values.
///
/// This is the only shape the store ever sees; the mapper converts typed
/// records to and from it.
pub type Document = Map<String, Value>;

/// Metadata block stored under the reserved `metaData` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMeta {
    /// Name of the table (matches the file name)
    pub table_name: String,

    /// Name of the column whose value keys each record; empty until set
    pub primary_key: String,

    /// Column descriptors keyed by column name
    pub columns: BTreeMap<String, ColumnDescriptor>,
}

impl TableMeta {
    fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            primary_key: String::new(),
            columns: BTreeMap::new(),
        }
    }
}

/// One table held in memory: its metadata plus all records keyed by the
/// string form of their primary-key value.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDocument {
    pub meta: TableMeta,

    /// Records in insertion order for this in-memory lifetime. Order is
    /// re-derived from file text on each load, so it is not stable across
    /// reloads.
    pub records: Map<String, Value>,
}

impl TableDocument {
    /// Default document for a freshly created table: empty columns, empty
    /// primary key.
    pub fn new(table_name: &str) -> Self {
        Self {
            meta: TableMeta::new(table_name),
            records: Map::new(),
        }
    }

    /// Serialize to the brace-stripped wire format.
    ///
    /// `metaData` is always the first entry, matching the original writer.
    pub fn encode(&self) -> String {
        let mut outer = Map::new();
        outer.insert(
            META_KEY.to_string(),
            serde_json::to_value(&self.meta).unwrap_or(Value::Null),
        );
        for (key, record) in &self.records {
            outer.insert(key.clone(), record.clone());
        }
        let text = Value::Object(outer).to_string();
        // strip the outer braces
        text[1..text.len() - 1].to_string()
    }

    /// Parse the brace-stripped wire format back into a table document.
    ///
    /// `path` is only used for error context.
    pub fn decode(raw: &str, path: &Path) -> Result<Self> {
        let wrapped = format!("{{{}}}", raw);
        let mut outer: Map<String, Value> = serde_json::from_str(&wrapped)
            .map_err(|e| TestDbError::format(path, e))?;

        // shift_remove keeps the remaining records in file order
        let meta_value = outer
            .shift_remove(META_KEY)
            .ok_or_else(|| TestDbError::format(path, "missing metaData entry"))?;
        let meta: TableMeta =
            serde_json::from_value(meta_value).map_err(|e| TestDbError::format(path, e))?;

        // every non-metadata entry must be a record object
        if let Some((key, _)) = outer.iter().find(|(_, v)| !v.is_object()) {
            return Err(TestDbError::format(
                path,
                format!("record '{}' is not a JSON object", key),
            ));
        }

        Ok(Self {
            meta,
            records: outer,
        })
    }
}
