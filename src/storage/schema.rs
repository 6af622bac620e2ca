//! Database schema definitions
//!
//! The schema is never created implicitly. A run against a database that
//! lacks these tables aborts during backup; `--init-schema` creates them.

/// Table holding one row per `(site, username)`
pub const COACHES_TABLE: &str = "coaches";

/// Table holding every known locale and its native name
pub const LANGUAGES_TABLE: &str = "languages";

/// Tables backed up before every run
pub const MANAGED_TABLES: [&str; 2] = [COACHES_TABLE, LANGUAGES_TABLE];

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Normalized coach profiles
CREATE TABLE IF NOT EXISTS coaches (
    site TEXT NOT NULL,
    username TEXT NOT NULL,
    name TEXT,
    image_url TEXT,
    title TEXT CHECK (title IN ('GM', 'IM', 'FM', 'CM', 'NM', 'WGM', 'WIM', 'WFM', 'WCM', 'WNM')),
    languages TEXT,
    rapid INTEGER,
    blitz INTEGER,
    bullet INTEGER,
    PRIMARY KEY (site, username)
);

-- Known languages, in display order
CREATE TABLE IF NOT EXISTS languages (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    pos INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
