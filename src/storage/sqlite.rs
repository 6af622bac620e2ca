//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::locale::Locale;
use crate::record::CoachRecord;
use crate::site::Site;
use crate::storage::schema::{initialize_schema, COACHES_TABLE};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    ///
    /// The schema is left untouched; see [`SqliteStorage::initialize_schema`].
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Opens an empty in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Creates the managed tables if they do not exist yet
    pub fn initialize_schema(&self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }
}

/// Quotes a table name, accepting only `[A-Za-z0-9_]`
fn quote_table(name: &str) -> StorageResult<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StorageError::InvalidTableName(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

fn languages_to_db(languages: Option<&Vec<Locale>>) -> StorageResult<Option<String>> {
    languages
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

fn languages_from_db(raw: Option<String>) -> StorageResult<Option<Vec<Locale>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let codes: Vec<String> =
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(Some(
        codes
            .iter()
            .filter_map(|code| Locale::from_code(code))
            .collect(),
    ))
}

impl Storage for SqliteStorage {
    // ===== Schema =====

    fn table_exists(&self, table: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn copy_table(&mut self, source: &str, target: &str) -> StorageResult<()> {
        if self.table_exists(target)? {
            return Err(StorageError::BackupExists(target.to_string()));
        }

        let sql = format!(
            "CREATE TABLE {} AS SELECT * FROM {}",
            quote_table(target)?,
            quote_table(source)?
        );
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    // ===== Coaches =====

    fn upsert_coach(&mut self, record: &CoachRecord) -> StorageResult<()> {
        let languages = languages_to_db(record.languages.as_ref())?;

        self.conn.execute(
            "INSERT INTO coaches
               (site, username, name, image_url, title, languages, rapid, blitz, bullet)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (site, username) DO UPDATE SET
               name = excluded.name,
               image_url = excluded.image_url,
               title = excluded.title,
               languages = excluded.languages,
               rapid = excluded.rapid,
               blitz = excluded.blitz,
               bullet = excluded.bullet",
            params![
                record.site.as_str(),
                record.username,
                record.name,
                record.image_url,
                record.title.map(|t| t.as_str()),
                languages,
                record.rapid,
                record.blitz,
                record.bullet,
            ],
        )?;
        Ok(())
    }

    fn get_coach(&self, site: Site, username: &str) -> StorageResult<Option<CoachRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, image_url, title, languages, rapid, blitz, bullet
                 FROM coaches WHERE site = ?1 AND username = ?2",
                params![site.as_str(), username],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                        row.get::<_, Option<i64>>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, image_url, title, languages, rapid, blitz, bullet)) = row else {
            return Ok(None);
        };

        Ok(Some(CoachRecord {
            site,
            username: username.to_string(),
            name,
            image_url,
            title: title.and_then(|t| t.parse().ok()),
            languages: languages_from_db(languages)?,
            rapid,
            blitz,
            bullet,
        }))
    }

    fn count_coaches(&self, site: Site) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE site = ?1", quote_table(COACHES_TABLE)?);
        let count: i64 = self
            .conn
            .query_row(&sql, params![site.as_str()], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Languages =====

    fn upsert_language(&mut self, locale: &Locale, position: usize) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO languages (code, name, pos) VALUES (?1, ?2, ?3)
             ON CONFLICT (code) DO UPDATE SET name = excluded.name",
            params![locale.code(), locale.native_name(), position as i64],
        )?;
        Ok(())
    }

    fn count_languages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM languages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
