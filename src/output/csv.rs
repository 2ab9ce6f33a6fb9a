// CSV reading and writing for the three report shapes.
//
// Headers come from the serde field names of the row types, so the column
// order is the struct field order. An empty slice still produces a
// header-only file.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Write `rows` to `path`, header first, replacing any existing file.
pub fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for {}", path.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(header)?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read every row of `path` into `T`. Rows that don't deserialize are an
/// error naming the line.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let row: T = record.with_context(|| format!("{}: bad row {}", path.display(), i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read `path` as loose string records keyed by header. Used for volume
/// files, whose columns vary (`volume` vs `search_volume`).
pub fn read_records(path: &Path) -> Result<Vec<std::collections::HashMap<String, String>>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.with_context(|| format!("Failed to read {}", path.display()))?);
    }
    Ok(rows)
}

pub const VOLUME_HEADER: &[&str] = &[
    "keyword",
    "country",
    "language",
    "search_volume",
    "cpc",
    "competition",
    "trend",
];

pub const AUDIT_HEADER: &[&str] = &[
    "keyword",
    "competitor",
    "used",
    "country",
    "installs_daily",
    "competitor_banned",
    "candidates",
];

pub const RANKED_HEADER: &[&str] = &["keyword", "competitor", "used", "country", "search_volume"];
