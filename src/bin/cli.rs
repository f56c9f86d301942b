//! testdb CLI
//!
//! Command-line interface for poking at a testdb directory: initialize a
//! database, manage tables and run key-based record operations.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use testdb::{Document, Result, TableStore};

/// testdb CLI
#[derive(Parser, Debug)]
#[command(name = "testdb")]
#[command(about = "Minimal single-file-per-table JSON document store")]
#[command(version)]
struct Args {
    /// Database root directory
    #[arg(short, long, default_value = ".")]
    dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a database under the root directory
    Init,

    /// List all tables
    Tables,

    /// Create a table
    CreateTable {
        /// The table name ([a-z0-9_]+)
        name: String,
    },

    /// Drop a table
    DropTable {
        /// The table to drop
        name: String,
    },

    /// Insert a JSON record under a key
    Insert {
        /// The table to insert into
        table: String,

        /// The record key
        key: String,

        /// The record as a JSON object
        json: String,
    },

    /// Get a record by key
    Get {
        /// The table to read
        table: String,

        /// The record key
        key: String,
    },

    /// Print all records of a table
    SelectAll {
        /// The table to read
        table: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,testdb=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Init => {
            TableStore::init(&args.dir)?;
            println!("initialized database under {}", args.dir);
            Ok(())
        }
        Commands::Tables => {
            let store = TableStore::open(&args.dir)?;
            for name in store.table_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::CreateTable { name } => {
            let mut store = TableStore::open(&args.dir)?;
            store.create_table(name)
        }
        Commands::DropTable { name } => {
            let mut store = TableStore::open(&args.dir)?;
            store.drop_table(name)
        }
        Commands::Insert { table, key, json } => {
            let record: Document = serde_json::from_str(json)
                .map_err(|e| testdb::TestDbError::Validation(format!("bad record JSON: {}", e)))?;
            let mut store = TableStore::open(&args.dir)?;
            store.insert_record_with_key(table, record, key)?;
            store.commit_table(table)
        }
        Commands::Get { table, key } => {
            let mut store = TableStore::open(&args.dir)?;
            match store.select_record_with_key(table, key)? {
                Some(record) => {
                    println!("{}", serde_json::Value::Object(record));
                    Ok(())
                }
                None => {
                    println!("null");
                    Ok(())
                }
            }
        }
        Commands::SelectAll { table } => {
            let mut store = TableStore::open(&args.dir)?;
            for record in store.select_all_records(table)? {
                println!("{}", serde_json::Value::Object(record));
            }
            Ok(())
        }
    }
}
