//! SQLite-backed contact storage built on prepared statements.
//!
//! # Intention
//!
//! - Provide a small, typed API over an embedded SQLite database.
//! - Encapsulate the prepared-statement lifecycle (prepare, bind, step,
//!   finalize) and SQLite error handling in one place.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - The embedded engine itself is rusqlite's bundled SQLite, unmodified.

pub mod contacts;
pub mod error;
pub mod sqlite;

pub use contacts::{contact_schema, Contact, ContactStore};
pub use error::{StoreError, StoreResult};
pub use sqlite::{Params, Row, Schema, SqlQuery, SqliteConfig, SqliteStore, Value};
