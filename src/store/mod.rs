//! Table Store Module
//!
//! Durable table/record storage with a simple two-level persistence model:
//! an index file plus one file per table.
//!
//! ## Responsibilities
//! - On-disk layout under `<root>/.testDB/`
//! - Table lifecycle (create/drop/load/unload/commit) and index consistency
//! - Column management with basic validation
//! - Record CRUD keyed by primary-key strings
//!
//! ## File Format
//! ```text
//! <root>/.testDB/testDBIndex.json     ["questions","answers"]
//! <root>/.testDB/tables/<name>.json   "metaData":{...},"<key>":{...},...
//! ```
//! Table files are the JSON text of the full table object with the outer
//! braces stripped; see [`table`] for the codec.

mod column;
mod layout;
mod manager;
mod table;

pub use column::ColumnDescriptor;
pub use layout::DbLayout;
pub use manager::{key_string, TableStore};
pub use table::{Document, TableDocument, TableMeta, META_KEY};
