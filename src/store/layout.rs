//! On-disk layout
//!
//! Computes every path the store touches, relative to a chosen root:
//!
//! ```text
//! <root>/.testDB/                     marker + "already initialized" check
//! <root>/.testDB/testDBIndex.json     JSON array of table names
//! <root>/.testDB/tables/<name>.json   one file per table
//! <root>/.testDB/tables/.deleted.json sentinel destination for dropped tables
//! ```

use std::path::{Path, PathBuf};

/// Marker directory created under the database root
const MARKER_DIR: &str = ".testDB";

/// Index file listing all table names
const INDEX_FILENAME: &str = "testDBIndex.json";

/// Subdirectory holding one file per table
const TABLES_DIR: &str = "tables";

/// Sentinel table name that dropped tables are renamed to.
/// Successive drops overwrite each other here; known limitation.
const DELETED_SENTINEL: &str = ".deleted";

/// Path calculator for one database root
#[derive(Debug, Clone)]
pub struct DbLayout {
    root: PathBuf,
}

impl DbLayout {
    /// Create a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The database root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.testDB`
    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    /// `<root>/.testDB/testDBIndex.json`
    pub fn index_path(&self) -> PathBuf {
        self.marker_dir().join(INDEX_FILENAME)
    }

    /// `<root>/.testDB/tables`
    pub fn tables_dir(&self) -> PathBuf {
        self.marker_dir().join(TABLES_DIR)
    }

    /// `<root>/.testDB/tables/<name>.json`
    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.tables_dir().join(format!("{}.json", table_name))
    }

    /// `<root>/.testDB/tables/.deleted.json`
    pub fn deleted_path(&self) -> PathBuf {
        self.table_path(DELETED_SENTINEL)
    }

    /// Whether the root has already been initialized (marker dir exists).
    pub fn is_initialized(&self) -> bool {
        self.marker_dir().exists()
    }
}

/// Validate a table name: non-empty, `[a-z0-9_]+` only.
///
/// Keeps table names safe to embed directly in file names.
pub fn name_is_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
