//! SQLite store behind the item source.
//!
//! # Responsibility
//! - Open configured connections for the recordings database.
//! - Keep the schema current before any repository touches it.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No repository reads or writes before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Recordings store failure, tagged with the bootstrap stage it came from.
#[derive(Debug)]
pub enum DbError {
    /// The store at `target` could not be opened or configured.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Migration `version` failed; no pending migration was applied.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The recordings file was written by a newer build and is left untouched.
    SchemaTooNew { found: u32, supported: u32 },
    /// A recordings query failed after bootstrap.
    Query(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open recordings store `{target}`: {source}")
            }
            Self::Migration {
                version,
                name,
                source,
            } => write!(
                f,
                "recordings migration {version} ({name}) failed: {source}"
            ),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "recordings schema version {found} is newer than supported {supported}"
            ),
            Self::Query(source) => write!(f, "recordings query failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } | Self::Query(source) => {
                Some(source)
            }
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
