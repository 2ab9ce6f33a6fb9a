// Cache schema.
//
// One table keyed by (namespace, key). Payloads are JSON so each namespace
// can store its own shape without migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Idempotent.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cache_entries (
            namespace TEXT NOT NULL,           -- play_search / aspy_meta
            key TEXT NOT NULL,
            payload TEXT NOT NULL,             -- JSON
            fetched_at TEXT NOT NULL,          -- RFC 3339, UTC
            PRIMARY KEY (namespace, key)
        );

        CREATE INDEX IF NOT EXISTS idx_cache_age
            ON cache_entries(fetched_at);
        ",
    )
    .context("Failed to create cache tables")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'cache_entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
