//! Column descriptors
//!
//! Plain metadata describing one column's type tag and constraints. The
//! CRUD path largely ignores these; they exist so callers can document a
//! table's shape and get duplicate/foreign-key checks on creation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constraints and metadata for a single column.
///
/// Wire field names are camelCase to stay compatible with existing table
/// files (`valueType`, `isPrimaryKey`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDescriptor {
    /// Column name, used as the key in the table's column map
    pub name: String,

    /// Free-form type tag (e.g. "string", "number"); not enforced
    pub value_type: String,

    /// Default value for the column (informational)
    pub default_value: Value,

    pub is_unique: bool,
    pub is_nullable: bool,
    pub is_required: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,

    /// Name of the referenced table when `is_foreign_key` is set
    pub references_table: String,
}

impl Default for ColumnDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            value_type: String::new(),
            default_value: Value::Null,
            is_unique: false,
            is_nullable: true,
            is_required: false,
            is_primary_key: false,
            is_foreign_key: false,
            references_table: String::new(),
        }
    }
}

impl ColumnDescriptor {
    /// Create a descriptor with the given name and defaults for the rest.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Apply primary-key normalization.
    ///
    /// A primary key is forced unique and non-nullable. `is_required` is
    /// left at whatever the caller declared; the original store behaved
    /// this way and existing files depend on it.
    pub fn normalize(&mut self) {
        if self.is_primary_key {
            self.is_unique = true;
            self.is_nullable = false;
        }
    }
}
