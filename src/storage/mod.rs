//! Storage module for persisting coach records
//!
//! This module handles all database operations for the scraper, including:
//! - SQLite schema management
//! - Pre-run backups of the managed tables
//! - Idempotent coach upserts keyed by `(site, username)`
//! - Seeding the table of known languages

mod schema;
mod sqlite;
mod traits;

pub use schema::{COACHES_TABLE, LANGUAGES_TABLE, MANAGED_TABLES};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::locale::Locale;
use crate::record::CoachRecord;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Opens a storage database without touching its schema
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::open(path)
}

/// Policy layer over a [`Storage`] backend
///
/// Cloning is cheap; clones share the same backend. Every site pipeline and
/// every worker holds one.
pub struct PersistenceGateway<S> {
    storage: Arc<Mutex<S>>,
}

impl<S> Clone for PersistenceGateway<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Storage> PersistenceGateway<S> {
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(Mutex::new(storage)))
    }

    pub fn from_shared(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, S>> {
        self.storage.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Runs a closure against the locked backend
    pub fn with_storage<T>(&self, f: impl FnOnce(&mut S) -> StorageResult<T>) -> StorageResult<T> {
        let mut storage = self.lock()?;
        f(&mut storage)
    }

    /// Snapshots every managed table under the current Unix timestamp
    ///
    /// Must run once, before any upsert of the run.
    pub fn backup(&self) -> StorageResult<Vec<String>> {
        self.backup_at(chrono::Utc::now().timestamp())
    }

    /// Snapshots every managed table as `<table>_<timestamp>`
    ///
    /// All tables are checked before anything is copied, so a missing table
    /// leaves the database untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(names)` - The backup tables that were created
    /// * `Err(StorageError::MissingTable)` - The schema was never initialized
    pub fn backup_at(&self, timestamp: i64) -> StorageResult<Vec<String>> {
        let mut storage = self.lock()?;

        for table in MANAGED_TABLES {
            if !storage.table_exists(table)? {
                return Err(StorageError::MissingTable(table.to_string()));
            }
        }

        let mut created = Vec::with_capacity(MANAGED_TABLES.len());
        for table in MANAGED_TABLES {
            let target = format!("{}_{}", table, timestamp);
            storage.copy_table(table, &target)?;
            tracing::info!("Backed up `{}` to `{}`", table, target);
            created.push(target);
        }

        Ok(created)
    }

    /// Seeds the `languages` table with every known locale
    pub fn load_languages(&self) -> StorageResult<usize> {
        let mut storage = self.lock()?;
        let locales = Locale::all();
        for (position, locale) in locales.iter().enumerate() {
            storage.upsert_language(locale, position)?;
        }
        tracing::debug!("Loaded {} languages", locales.len());
        Ok(locales.len())
    }

    /// Inserts or fully replaces one coach row
    pub fn upsert(&self, record: &CoachRecord) -> StorageResult<()> {
        self.lock()?.upsert_coach(record)
    }
}
