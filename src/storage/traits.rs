//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::locale::Locale;
use crate::record::CoachRecord;
use crate::site::Site;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Missing `{0}` table; initialize the schema first (--init-schema)")]
    MissingTable(String),

    #[error("Backup table `{0}` already exists")]
    BackupExists(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// These are the relational primitives the persistence gateway is built on.
/// Policy (which tables to back up, when a missing table is fatal) lives in
/// the gateway, not here.
pub trait Storage {
    // ===== Schema =====

    /// Returns true if a table with this name exists
    fn table_exists(&self, table: &str) -> StorageResult<bool>;

    /// Creates `target` as a full copy of `source`
    fn copy_table(&mut self, source: &str, target: &str) -> StorageResult<()>;

    // ===== Coaches =====

    /// Inserts a coach, or replaces every non-key column of the existing row
    ///
    /// Fields absent from the record are written as NULL.
    fn upsert_coach(&mut self, record: &CoachRecord) -> StorageResult<()>;

    /// Gets a coach by key
    fn get_coach(&self, site: Site, username: &str) -> StorageResult<Option<CoachRecord>>;

    /// Counts stored coaches of one site
    fn count_coaches(&self, site: Site) -> StorageResult<u64>;

    // ===== Languages =====

    /// Inserts or renames a known language at a display position
    fn upsert_language(&mut self, locale: &Locale, position: usize) -> StorageResult<()>;

    /// Counts known languages
    fn count_languages(&self) -> StorageResult<u64>;
}
