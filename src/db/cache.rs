// ResponseCache: async wrapper around the cache connection.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Sync. Methods lock, do synchronous rusqlite work, and return; the lock
// is never held across an await.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::queries;

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL_DAYS: i64 = 3;

pub struct ResponseCache {
    conn: Mutex<Connection>,
    ttl_days: i64,
}

impl ResponseCache {
    pub fn new(conn: Connection, ttl_days: i64) -> Self {
        Self {
            conn: Mutex::new(conn),
            ttl_days,
        }
    }

    /// Fresh payload for `(namespace, key)`, decoded. Expired or
    /// undecodable entries read as a miss.
    pub async fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Result<Option<T>> {
        let entry = {
            let conn = self.conn.lock().await;
            queries::get_entry(&conn, namespace, key)?
        };

        let Some(entry) = entry else {
            return Ok(None);
        };
        if queries::is_expired(&entry.fetched_at, self.ttl_days, Utc::now()) {
            debug!(namespace, key, "Cache entry expired");
            return Ok(None);
        }

        match serde_json::from_str(&entry.payload) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(namespace, key, error = %e, "Cache entry undecodable");
                Ok(None)
            }
        }
    }

    /// Store `value` under `(namespace, key)` stamped with the current time.
    pub async fn put<T: Serialize + ?Sized>(&self, namespace: &str, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value).context("Failed to encode cache payload")?;
        let conn = self.conn.lock().await;
        queries::put_entry(&conn, namespace, key, &payload, Utc::now())
    }

    pub async fn counts(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().await;
        queries::count_by_namespace(&conn)
    }

    pub async fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        queries::clear(&conn, None)
    }
}
