// Ranking: join the audit with per-country volumes, apply caps and
// filters, sort, and optionally keep the top N per country.
//
// The join key is (country, canonical keyword) so the same brand in two
// countries never borrows the other's volume.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::catalog::{self, Country};
use crate::models::{AuditRow, RankedRow};
use crate::output::csv;
use crate::pipeline::fetch::result_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortBy {
    /// Search volume only.
    #[default]
    Volume,
    /// Country code ascending, then volume.
    Country,
}

#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    /// Upper cap: keep `search_volume <= cap`.
    pub cap: Option<u64>,
    /// Lower cap: keep `search_volume >= cap_lower`.
    pub cap_lower: Option<u64>,
    /// Rows with a competitor bypass both caps.
    pub cap_exempt_competitors: bool,
    pub only_nonused: bool,
    pub only_with_competitor: bool,
    pub sort: SortOrder,
    pub sort_by: SortBy,
    pub top_per_country: Option<usize>,
}

/// Max volume per (country, canonical keyword).
pub type VolumeIndex = HashMap<(String, String), u64>;

/// Lenient volume parse: integers, floats (truncated) and blanks; anything
/// unparsable or negative is 0.
pub fn parse_volume(raw: &str) -> u64 {
    let raw = raw.trim();
    raw.parse::<u64>().unwrap_or_else(|_| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0)
    })
}

/// Fold one country's volume records into `index`. Records without a
/// `keyword` column are ignored; `volume` stands in for `search_volume`.
pub fn index_volumes(index: &mut VolumeIndex, country: &str, records: &[HashMap<String, String>]) {
    for record in records {
        let Some(keyword) = record.get("keyword") else {
            continue;
        };
        let volume = record
            .get("search_volume")
            .or_else(|| record.get("volume"))
            .map(|v| parse_volume(v))
            .unwrap_or(0);
        let key = (
            country.to_string(),
            catalog::canonical_key(Some(country), keyword.trim()),
        );
        let slot = index.entry(key).or_insert(0);
        *slot = (*slot).max(volume);
    }
}

/// Load `<cc>_results.csv` from `dir` for each country. Missing files are
/// skipped.
pub fn load_volumes(dir: &Path, countries: &[&Country]) -> Result<VolumeIndex> {
    let mut index = VolumeIndex::new();
    for country in countries {
        let path = result_path(dir, country.code);
        if !path.exists() {
            debug!(path = %path.display(), "Volume file missing, skipped");
            continue;
        }
        let records = csv::read_records(&path)?;
        index_volumes(&mut index, country.code, &records);
    }
    Ok(index)
}

/// Resolve an audit `country` cell (code or English title) to a code.
fn country_code(cell: &str) -> Option<&'static str> {
    catalog::country(cell).ok().map(|c| c.code).or_else(|| {
        catalog::supported_countries()
            .into_iter()
            .filter_map(|code| catalog::country(code).ok())
            .find(|c| c.title.eq_ignore_ascii_case(cell.trim()))
            .map(|c| c.code)
    })
}

/// Audit rows for the selected countries, with `country` normalised to the
/// code. Rows for other or unknown countries are dropped.
pub fn select_audit_rows(rows: Vec<AuditRow>, countries: &[&Country]) -> Vec<AuditRow> {
    rows.into_iter()
        .filter_map(|mut row| {
            let code = country_code(&row.country)?;
            if !countries.iter().any(|c| c.code == code) {
                return None;
            }
            row.country = code.to_string();
            Some(row)
        })
        .collect()
}

/// Attach volumes to audit rows. Unmatched rows get 0.
pub fn merge(audit: &[AuditRow], volumes: &VolumeIndex) -> Vec<RankedRow> {
    audit
        .iter()
        .map(|row| {
            let key = (
                row.country.clone(),
                catalog::canonical_key(Some(&row.country), &row.keyword),
            );
            RankedRow {
                keyword: row.keyword.clone(),
                competitor: row.competitor.clone(),
                used: row.used,
                country: row.country.clone(),
                search_volume: volumes.get(&key).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Filters in order: non-used, upper cap, lower cap, with-competitor.
pub fn apply_filters(rows: Vec<RankedRow>, opts: &RankOptions) -> Vec<RankedRow> {
    rows.into_iter()
        .filter(|r| !opts.only_nonused || !r.used)
        .filter(|r| {
            let exempt = opts.cap_exempt_competitors && r.has_competitor();
            exempt
                || (opts.cap.map_or(true, |cap| r.search_volume <= cap)
                    && opts.cap_lower.map_or(true, |low| r.search_volume >= low))
        })
        .filter(|r| !opts.only_with_competitor || r.has_competitor())
        .collect()
}

/// Stable sort per `opts.sort_by` / `opts.sort`.
pub fn sort_rows(rows: &mut [RankedRow], opts: &RankOptions) {
    let by_volume = |a: &RankedRow, b: &RankedRow| match opts.sort {
        SortOrder::Desc => b.search_volume.cmp(&a.search_volume),
        SortOrder::Asc => a.search_volume.cmp(&b.search_volume),
    };
    match opts.sort_by {
        SortBy::Volume => rows.sort_by(by_volume),
        SortBy::Country => {
            rows.sort_by(|a, b| a.country.cmp(&b.country).then_with(|| by_volume(a, b)))
        }
    }
}

/// First `n` rows of each country, keeping the incoming order.
pub fn top_per_country(rows: Vec<RankedRow>, n: usize) -> Vec<RankedRow> {
    let mut taken: HashMap<String, usize> = HashMap::new();
    rows.into_iter()
        .filter(|r| {
            let count = taken.entry(r.country.clone()).or_insert(0);
            *count += 1;
            *count <= n
        })
        .collect()
}

/// Merge, filter, sort and trim in one go.
pub fn rank(audit: &[AuditRow], volumes: &VolumeIndex, opts: &RankOptions) -> Vec<RankedRow> {
    let mut rows = apply_filters(merge(audit, volumes), opts);
    sort_rows(&mut rows, opts);
    match opts.top_per_country {
        Some(n) if n > 0 => top_per_country(rows, n),
        _ => rows,
    }
}

/// Read the audit file, rank it against the volume files in `volume_dir`
/// and write `out`. An empty selection still writes a header-only file.
pub fn run(
    audit_path: &Path,
    volume_dir: &Path,
    countries: &[&Country],
    opts: &RankOptions,
    out: &Path,
) -> Result<Vec<RankedRow>> {
    let audit: Vec<AuditRow> = csv::read_rows(audit_path)
        .with_context(|| format!("Failed to read audit file {}", audit_path.display()))?;
    let audit = select_audit_rows(audit, countries);

    let rows = if audit.is_empty() {
        Vec::new()
    } else {
        let volumes = load_volumes(volume_dir, countries)?;
        rank(&audit, &volumes, opts)
    };

    csv::write_rows(out, csv::RANKED_HEADER, &rows)?;
    info!(rows = rows.len(), out = %out.display(), "Ranking written");
    if audit.is_empty() {
        println!("Saved: {} (no audit rows for selected countries)", out.display());
    } else {
        println!("Saved: {}", out.display());
    }
    Ok(rows)
}
