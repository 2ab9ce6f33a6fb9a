// System status display: masked keys, key file, cache statistics.

use anyhow::Result;

use crate::config::Config;
use crate::db::{self, ResponseCache};

/// Display status to the terminal. With `clear_cache`, empty the cache
/// first and report how many entries went.
pub async fn show(config: &Config, clear_cache: bool) -> Result<()> {
    println!("Keys: {}", config.masked_summary());

    let key_file = &config.key_file;
    if key_file.exists() {
        println!("Key file: {}", key_file.display());
    } else {
        println!("Key file: {} (not created)", key_file.display());
        println!("  Run `keyword-pipeline save-keys` to store keys there");
    }

    if !config.cache_db.exists() {
        println!("Cache: {} (empty)", config.cache_db.display());
        return Ok(());
    }

    let file_size = std::fs::metadata(&config.cache_db)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Cache: {} ({})", config.cache_db.display(), file_size);

    let cache = ResponseCache::new(db::initialize(&config.cache_db)?, 0);
    if clear_cache {
        let removed = cache.clear().await?;
        println!("  Cleared {removed} entries");
    }

    let counts = cache.counts().await?;
    if counts.is_empty() {
        println!("  No cached entries");
    }
    for (namespace, count) in counts {
        println!("  {namespace}: {count}");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
