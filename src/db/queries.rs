// Cache queries. All SQL lives here; callers get plain Rust functions over
// a `&Connection`.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// A stored payload and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: String,
    pub fetched_at: String,
}

/// Look up one entry regardless of age.
pub fn get_entry(conn: &Connection, namespace: &str, key: &str) -> Result<Option<CacheEntry>> {
    let mut stmt =
        conn.prepare("SELECT payload, fetched_at FROM cache_entries WHERE namespace = ?1 AND key = ?2")?;
    let entry = stmt
        .query_row(params![namespace, key], |row| {
            Ok(CacheEntry {
                payload: row.get(0)?,
                fetched_at: row.get(1)?,
            })
        })
        .optional()?;
    Ok(entry)
}

/// Insert or replace an entry.
pub fn put_entry(
    conn: &Connection,
    namespace: &str,
    key: &str,
    payload: &str,
    fetched_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO cache_entries (namespace, key, payload, fetched_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(namespace, key) DO UPDATE SET payload = ?3, fetched_at = ?4",
        params![namespace, key, payload, fetched_at.to_rfc3339()],
    )?;
    Ok(())
}

/// Entry counts per namespace, alphabetical.
pub fn count_by_namespace(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT namespace, COUNT(*) FROM cache_entries GROUP BY namespace ORDER BY namespace",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<(String, i64)>>>()?;
    Ok(rows)
}

/// Delete entries, all of them or one namespace. Returns rows removed.
pub fn clear(conn: &Connection, namespace: Option<&str>) -> Result<usize> {
    let removed = match namespace {
        Some(ns) => conn.execute("DELETE FROM cache_entries WHERE namespace = ?1", params![ns])?,
        None => conn.execute("DELETE FROM cache_entries", [])?,
    };
    Ok(removed)
}

/// Whether an entry fetched at `fetched_at` is `ttl_days` or more old at `now`.
/// A timestamp that doesn't parse is treated as expired.
pub fn is_expired(fetched_at: &str, ttl_days: i64, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(fetched_at) {
        Ok(ts) => now.signed_duration_since(ts.with_timezone(&Utc)) >= Duration::days(ttl_days),
        Err(_) => true,
    }
}
