//! Table Store
//!
//! Owns the two-level persistence model: an index file listing table names
//! plus one file per table, with a lazy in-memory cache of loaded tables.
//!
//! ## Responsibilities
//! - Initialize the on-disk layout (idempotent)
//! - Table lifecycle: create, drop, load, unload, commit
//! - Column management with duplicate/foreign-key validation
//! - Record CRUD keyed by the string form of the primary-key value
//!
//! ## Invariants
//! - Every name in the index has a corresponding table file on disk
//! - Every cached table's name is in the index
//! - No record key is the literal `"metaData"` (reserved metadata slot)

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TestDbError};

use super::column::ColumnDescriptor;
use super::layout::{name_is_valid, DbLayout};
use super::table::{Document, TableDocument, META_KEY};

/// Handle to one database root.
///
/// Carries the on-disk layout, the in-memory table index and the cache of
/// loaded tables. All state is instance state; multiple independent stores
/// may coexist, one per root. Single-threaded by design: callers needing
/// concurrency must wrap the handle themselves.
#[derive(Debug)]
pub struct TableStore {
    /// Path calculator for the database root
    layout: DbLayout,

    /// Ordered table names currently known to exist; unique entries
    table_index: Vec<String>,

    /// Lazily populated cache of loaded tables
    loaded: HashMap<String, TableDocument>,
}

impl TableStore {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Idempotently create the database layout under `root`.
    ///
    /// Creates the `.testDB` marker directory, the `tables` subdirectory and
    /// an empty index file. No-op, no error, if the marker already exists.
    pub fn init(root: impl AsRef<Path>) -> Result<()> {
        let layout = DbLayout::new(root.as_ref());
        if layout.is_initialized() {
            return Ok(());
        }
        fs::create_dir_all(layout.marker_dir())?;
        fs::create_dir_all(layout.tables_dir())?;
        fs::write(layout.index_path(), "[]")?;
        tracing::info!(root = %layout.root().display(), "initialized database");
        Ok(())
    }

    /// Open a store against an already-initialized root.
    ///
    /// Reads the index file into memory. Fails with `Io` if the index file
    /// is missing, `Format` if it is malformed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let layout = DbLayout::new(root.as_ref());
        let index_path = layout.index_path();
        let raw = fs::read_to_string(&index_path)?;
        let table_index: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| TestDbError::format(&index_path, e))?;
        Ok(Self {
            layout,
            table_index,
            loaded: HashMap::new(),
        })
    }

    /// The database root directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Table names currently in the index, in index order.
    pub fn table_names(&self) -> &[String] {
        &self.table_index
    }

    // =========================================================================
    // Table Lifecycle
    // =========================================================================

    /// Membership test against the in-memory index.
    pub fn table_exists(&self, name: &str) -> bool {
        self.table_index.iter().any(|t| t == name)
    }

    /// Create a table. Idempotent by name: a second call is a no-op.
    ///
    /// Writes a default table document (empty columns, empty primary key)
    /// as the initial file content and persists the updated index.
    pub fn create_table(&mut self, name: &str) -> Result<()> {
        if !name_is_valid(name) {
            return Err(TestDbError::Validation(format!(
                "invalid table name '{}': must match [a-z0-9_]+",
                name
            )));
        }
        if self.table_exists(name) {
            return Ok(());
        }

        let doc = TableDocument::new(name);
        fs::write(self.layout.table_path(name), doc.encode())?;

        self.table_index.push(name.to_string());
        self.persist_index()?;
        tracing::info!(table = name, "created table");
        Ok(())
    }

    /// Drop a table: remove it from the index, rename its file to the
    /// `.deleted.json` sentinel and evict it from the cache.
    ///
    /// Successive drops overwrite the same sentinel file. Fails with
    /// `NotFound` if the table is not in the index.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let position = self
            .table_index
            .iter()
            .position(|t| t == name)
            .ok_or_else(|| TestDbError::NotFound(format!("table '{}' does not exist", name)))?;
        self.table_index.remove(position);
        self.persist_index()?;

        fs::rename(self.layout.table_path(name), self.layout.deleted_path())?;
        self.loaded.remove(name);
        tracing::info!(table = name, "dropped table");
        Ok(())
    }

    /// Load a table into the cache.
    ///
    /// Returns `Ok(true)` iff the table is resident in memory after the
    /// call, whether or not this call performed the load. The name must be
    /// valid or present in the index. Fails with `NotFound` if the table
    /// file does not exist, `Format` if its content does not parse.
    pub fn load_table(&mut self, name: &str) -> Result<bool> {
        if self.loaded.contains_key(name) {
            return Ok(true);
        }
        if !name_is_valid(name) && !self.table_exists(name) {
            return Err(TestDbError::Validation(format!(
                "invalid table name '{}'",
                name
            )));
        }

        let path = self.layout.table_path(name);
        if !path.exists() {
            return Err(TestDbError::NotFound(format!(
                "no table file for '{}'",
                name
            )));
        }
        let raw = fs::read_to_string(&path)?;
        let doc = TableDocument::decode(&raw, &path)?;
        self.loaded.insert(name.to_string(), doc);
        tracing::debug!(table = name, "loaded table");
        Ok(true)
    }

    /// Evict a table from the cache without persisting.
    ///
    /// Uncommitted in-memory changes are lost by design; commit first.
    pub fn unload_table(&mut self, name: &str) {
        if self.loaded.remove(name).is_some() {
            tracing::debug!(table = name, "unloaded table");
        }
    }

    /// Write a loaded table back to its file and re-persist the index.
    ///
    /// No-op if the table is not loaded.
    pub fn commit_table(&mut self, name: &str) -> Result<()> {
        let doc = match self.loaded.get(name) {
            Some(doc) => doc,
            None => return Ok(()),
        };
        fs::write(self.layout.table_path(name), doc.encode())?;
        // re-persist the index so it stays consistent with the table files
        self.persist_index()?;
        tracing::debug!(table = name, "committed table");
        Ok(())
    }

    // =========================================================================
    // Column Management
    // =========================================================================

    /// Add a column to a table's metadata, in memory only.
    ///
    /// The descriptor is normalized first (primary keys become unique and
    /// non-nullable). Rejected with `Validation` if the column name is
    /// empty or already present, or if the descriptor marks a foreign key
    /// whose referenced table is not in the index. Caller must commit.
    pub fn create_column(&mut self, table: &str, descriptor: ColumnDescriptor) -> Result<()> {
        let mut descriptor = descriptor;
        descriptor.normalize();

        if descriptor.name.is_empty() {
            return Err(TestDbError::Validation(
                "column name must not be empty".to_string(),
            ));
        }
        if descriptor.is_foreign_key && !self.table_exists(&descriptor.references_table) {
            return Err(TestDbError::Validation(format!(
                "foreign key column '{}' references unknown table '{}'",
                descriptor.name, descriptor.references_table
            )));
        }

        let doc = self.table_mut(table)?;
        if doc.meta.columns.contains_key(&descriptor.name) {
            return Err(TestDbError::Validation(format!(
                "column '{}' already exists",
                descriptor.name
            )));
        }
        doc.meta
            .columns
            .insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Record which column keys this table's records, in memory only.
    ///
    /// `insert_record` derives record keys from this. Caller must commit.
    pub fn set_primary_key(&mut self, table: &str, column: &str) -> Result<()> {
        let doc = self.table_mut(table)?;
        doc.meta.primary_key = column.to_string();
        Ok(())
    }

    // =========================================================================
    // Record CRUD
    // =========================================================================

    /// Insert a record keyed by the string form of its primary-key field.
    ///
    /// Loads the table if needed. Fails with `Validation` when the table
    /// has no primary key configured or the record lacks that field.
    /// Overwrites any existing record at the derived key.
    pub fn insert_record(&mut self, table: &str, record: Document) -> Result<()> {
        let doc = self.table_mut(table)?;
        let pk = doc.meta.primary_key.clone();
        if pk.is_empty() {
            return Err(TestDbError::Validation(format!(
                "table '{}' has no primary key configured",
                table
            )));
        }
        let key = match record.get(&pk) {
            Some(value) => key_string(value),
            None => {
                return Err(TestDbError::Validation(format!(
                    "record is missing primary-key field '{}'",
                    pk
                )))
            }
        };
        self.insert_record_with_key(table, record, &key)
    }

    /// Insert a record under a caller-supplied key.
    ///
    /// Loads the table if needed; overwrites any existing record at `key`.
    /// The reserved key `"metaData"` is rejected with `Validation`.
    pub fn insert_record_with_key(
        &mut self,
        table: &str,
        record: Document,
        key: &str,
    ) -> Result<()> {
        if key == META_KEY {
            return Err(TestDbError::Validation(format!(
                "'{}' is a reserved record key",
                META_KEY
            )));
        }
        let doc = self.table_mut(table)?;
        doc.records.insert(key.to_string(), Value::Object(record));
        Ok(())
    }

    /// Remove the record at `key`. Loads the table if needed; no-op if the
    /// key is absent.
    pub fn delete_record_with_key(&mut self, table: &str, key: &str) -> Result<()> {
        let doc = self.table_mut(table)?;
        doc.records.shift_remove(key);
        Ok(())
    }

    /// Fetch the record at `key`, or `None` if absent. Loads the table if
    /// needed.
    pub fn select_record_with_key(&mut self, table: &str, key: &str) -> Result<Option<Document>> {
        let doc = self.table_mut(table)?;
        Ok(doc.records.get(key).and_then(Value::as_object).cloned())
    }

    /// All records of a table, cloned, in map-iteration order.
    ///
    /// A freshly created table yields an empty vector. Order is not stable
    /// across reloads (it is re-derived from file text each load).
    pub fn select_all_records(&mut self, table: &str) -> Result<Vec<Document>> {
        let doc = self.table_mut(table)?;
        Ok(doc
            .records
            .values()
            .filter_map(Value::as_object)
            .cloned()
            .collect())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Load (if needed) and return the cached table document.
    fn table_mut(&mut self, name: &str) -> Result<&mut TableDocument> {
        self.load_table(name)?;
        self.loaded
            .get_mut(name)
            .ok_or_else(|| TestDbError::NotFound(format!("table '{}' is not loaded", name)))
    }

    /// Rewrite the index file from the in-memory index. Full rewrite, no
    /// append log.
    fn persist_index(&self) -> Result<()> {
        let text = serde_json::to_string(&self.table_index)
            .map_err(|e| TestDbError::format(self.layout.index_path(), e))?;
        fs::write(self.layout.index_path(), text)?;
        Ok(())
    }
}

/// The string form of a JSON value used as a record key: the inner string
/// for strings, the JSON text otherwise.
pub fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
