//! Repository Facade
//!
//! Binds one record type permanently to one table and database root,
//! exposing id-based CRUD through the mapper and table store.
//!
//! All mutating operations commit synchronously before returning; there is
//! no deferred or batched write path.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use crate::error::{Result, TestDbError};
use crate::mapper::{self, Record};
use crate::store::{key_string, TableStore};

/// Field that keys every record saved through a repository.
const ID_FIELD: &str = "id";

/// Per-record-type convenience wrapper over [`TableStore`] and the mapper.
///
/// Records are keyed by the string form of their `id` document field.
pub struct Repository<R: Record> {
    store: TableStore,
    table: String,
    _record: PhantomData<R>,
}

impl<R: Record> Repository<R> {
    /// Open a repository for `table` under `root`.
    ///
    /// Runs the idempotent init / open / create-table / commit sequence, so
    /// a missing database or table is created on first use.
    pub fn open(root: impl AsRef<Path>, table: &str) -> Result<Self> {
        TableStore::init(root.as_ref())?;
        let mut store = TableStore::open(root.as_ref())?;
        store.create_table(table)?;
        store.commit_table(table)?;
        Ok(Self {
            store,
            table: table.to_string(),
            _record: PhantomData,
        })
    }

    /// Fetch the record with the given id, or `None`.
    pub fn find_by_id(&mut self, id: impl fmt::Display) -> Result<Option<R>> {
        let doc = self
            .store
            .select_record_with_key(&self.table, &id.to_string())?;
        match doc {
            Some(doc) => Ok(Some(mapper::from_document(&doc)?)),
            None => Ok(None),
        }
    }

    /// Fetch every record in the table.
    pub fn find_all(&mut self) -> Result<Vec<R>> {
        self.store
            .select_all_records(&self.table)?
            .iter()
            .map(mapper::from_document)
            .collect()
    }

    /// Whether a record with the given id exists.
    pub fn exists(&mut self, id: impl fmt::Display) -> Result<bool> {
        Ok(self
            .store
            .select_record_with_key(&self.table, &id.to_string())?
            .is_some())
    }

    /// Remove the record with the given id and commit. No-op if absent.
    pub fn delete(&mut self, id: impl fmt::Display) -> Result<()> {
        self.store
            .delete_record_with_key(&self.table, &id.to_string())?;
        self.store.commit_table(&self.table)
    }

    /// Store a record keyed by the string form of its `id` field and
    /// commit. Overwrites any existing record with the same id.
    pub fn save(&mut self, record: &R) -> Result<()> {
        let doc = mapper::to_document(record);
        let key = match doc.get(ID_FIELD) {
            Some(value) => key_string(value),
            None => {
                return Err(TestDbError::Validation(format!(
                    "record has no '{}' field to key by",
                    ID_FIELD
                )))
            }
        };
        self.store.insert_record_with_key(&self.table, doc, &key)?;
        self.store.commit_table(&self.table)
    }

    /// The table this repository is bound to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Direct access to the underlying store, for column setup and other
    /// operations the facade does not cover.
    pub fn store_mut(&mut self) -> &mut TableStore {
        &mut self.store
    }
}
