//! timemark database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! SQLite-backed synchronized store.
//!
//! # Usage
//!
//! ```no_run
//! use timemark::database::{Database, SqliteSyncStore};
//!
//! let db = Database::open("timemark.db").expect("failed to open database");
//! let store = SqliteSyncStore::new(db, "sync", None);
//! ```

pub mod connection;
pub mod migrations;
pub mod sync_store;

pub use connection::Database;
pub use sync_store::SqliteSyncStore;
