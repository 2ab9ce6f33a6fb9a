// Database layer: SQLite response cache for Play searches and AppstoreSpy
// lookups.
//
// rusqlite with the "bundled" feature, so there's no system SQLite
// dependency. The file lives wherever KEYWORD_PIPELINE_CACHE_DB points
// (defaults to ./.cache/pipeline.db).

pub mod cache;
pub mod cached;
pub mod queries;
pub mod schema;

pub use cache::ResponseCache;
pub use cached::{CachedInstalls, CachedSearch};

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the cache database and create its tables.
pub fn initialize(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory for cache: {}", db_path.display())
            })?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open cache at {}", db_path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// In-memory cache with the same schema. Used by tests and when the
/// on-disk cache can't be opened.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory cache")?;
    schema::create_tables(&conn)?;
    Ok(conn)
}
