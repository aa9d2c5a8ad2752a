//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for coachcal core.
//! - Apply schema migrations in deterministic order.
//! - Define the on-disk text encoding of wall-clock instants.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - Instants are stored as fixed-width `YYYY-MM-DDTHH:MM:SS.fff` text so
//!   lexical order equals chronological order.

use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Encodes a wall-clock instant for storage.
pub fn instant_to_db(value: NaiveDateTime) -> String {
    value.format(INSTANT_FORMAT).to_string()
}

/// Decodes a stored wall-clock instant; `None` for malformed text.
pub fn parse_db_instant(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, INSTANT_FORMAT).ok()
}
