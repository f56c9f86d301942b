//! # testdb
//!
//! A minimal embeddable "test database": directory-backed tables persisted
//! as one JSON file each, with:
//! - Primary-key CRUD on plain JSON records
//! - Column descriptors with basic validation
//! - A generic `Repository<R>` facade binding one record type to one table
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Caller                      │
//! └─────────────────────┬───────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────┐
//! │              Repository<R>                  │
//! │        (per-record-type facade)             │
//! └──────────┬──────────────────────┬───────────┘
//!            │                      │
//!            ▼                      ▼
//!     ┌─────────────┐        ┌─────────────┐
//!     │   Mapper    │        │ TableStore  │
//!     │ (R ⇄ doc)   │        │ (doc ⇄ file)│
//!     └─────────────┘        └──────┬──────┘
//!                                   │
//!                                   ▼
//!                         <root>/.testDB/
//!                           ├── testDBIndex.json
//!                           └── tables/<name>.json
//! ```
//!
//! Everything is synchronous, single-threaded, blocking I/O. A `TableStore`
//! is an ordinary owned handle; multiple independent stores may coexist,
//! one per database root.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;

pub mod mapper;
pub mod repository;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TestDbError};
pub use mapper::{FieldBinding, FieldValue, Record};
pub use repository::Repository;
pub use store::{ColumnDescriptor, Document, TableStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of testdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
