// Full pipeline: fetch -> audit -> rank once per cap.
//
// Also owns the wiring shared with the standalone `audit` command: opening
// the response cache and building the Play / AppstoreSpy sources behind
// their traits.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::appstorespy::{AppstoreSpyClient, InstallsSource, NoopInstalls};
use crate::catalog::{Country, CountrySelector};
use crate::config::Config;
use crate::db::{self, CachedInstalls, CachedSearch, ResponseCache};
use crate::keyapp::client::KeyappClient;
use crate::keywordtool::client::KeywordToolClient;
use crate::models::AuditRow;
use crate::output::terminal;
use crate::pipeline::audit::{self, AuditOptions, DEFAULT_AUDIT_FILE};
use crate::pipeline::fetch::{self, FetchOptions};
use crate::pipeline::rank::{self, RankOptions};
use crate::play::{GooglePlaySearch, StoreSearch};

/// Parse `--caps`: comma separated whole numbers. Blank and malformed
/// entries (including negatives) are skipped.
pub fn parse_caps(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(cap) => Some(cap),
            Err(_) => {
                warn!(entry = s, "Ignoring malformed cap");
                None
            }
        })
        .collect()
}

/// Output file for one rank pass: `<label>_competitors_all.csv` without a
/// cap, `<label>_competitors_cap<N>.csv` with one. An explicit `--rank-out`
/// wins; when several caps share it, each gets a `_cap<N>` suffix so they
/// don't overwrite each other.
pub fn output_name(
    label: &str,
    cap: Option<u64>,
    rank_out: Option<&Path>,
    cap_count: usize,
) -> PathBuf {
    match (rank_out, cap) {
        (Some(path), Some(cap)) if cap_count > 1 => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("ranked");
            let name = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{stem}_cap{cap}.{ext}"),
                None => format!("{stem}_cap{cap}"),
            };
            path.with_file_name(name)
        }
        (Some(path), _) => path.to_path_buf(),
        (None, None) => format!("{}_competitors_all.csv", label.to_lowercase()).into(),
        (None, Some(cap)) => format!("{}_competitors_cap{cap}.csv", label.to_lowercase()).into(),
    }
}

/// Non-used filtering is on unless `--include-used`; `--only-nonused`
/// forces it back on.
pub fn filter_nonused(include_used: bool, only_nonused: bool) -> bool {
    only_nonused || !include_used
}

/// Settings for the audit stage.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub keyapp_base_url: String,
    pub play_pause: Duration,
    pub aspy_pause: Duration,
    pub cache_ttl_days: i64,
    pub options: AuditOptions,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            keyapp_base_url: crate::keyapp::client::DEFAULT_BASE_URL.to_string(),
            play_pause: Duration::from_millis(200),
            aspy_pause: Duration::from_millis(150),
            cache_ttl_days: crate::db::cache::DEFAULT_TTL_DAYS,
            options: AuditOptions::default(),
        }
    }
}

/// Open the on-disk cache, falling back to an in-memory one.
pub fn open_cache(path: &Path, ttl_days: i64) -> Result<Arc<ResponseCache>> {
    let conn = match db::initialize(path) {
        Ok(conn) => conn,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cache unavailable; using in-memory cache");
            db::open_in_memory()?
        }
    };
    Ok(Arc::new(ResponseCache::new(conn, ttl_days)))
}

/// Play search with caching.
pub fn build_search(cache: Arc<ResponseCache>, pause: Duration) -> Result<Box<dyn StoreSearch>> {
    Ok(Box::new(CachedSearch::new(GooglePlaySearch::new(pause)?, cache)))
}

/// AppstoreSpy enrichment with caching, or nothing without a key.
pub fn build_installs(
    api_key: Option<&str>,
    cache: Arc<ResponseCache>,
    pause: Duration,
) -> Result<Box<dyn InstallsSource>> {
    match api_key {
        Some(key) => Ok(Box::new(CachedInstalls::new(
            AppstoreSpyClient::new(key, pause)?,
            cache,
        ))),
        None => {
            info!("No AppstoreSpy key; competitors will be the first Play result");
            Ok(Box::new(NoopInstalls))
        }
    }
}

/// Audit stage as run by both `audit` and `run`.
pub async fn run_audit(
    config: &Config,
    settings: &AuditSettings,
    countries: &[&'static Country],
    out: &Path,
) -> Result<Vec<AuditRow>> {
    let keyapp = KeyappClient::new(&settings.keyapp_base_url, config.require_keyapp()?)?;
    let titles = keyapp.app_titles().await;
    info!(titles = titles.len(), "Keyapp portfolio loaded");

    let cache = open_cache(&config.cache_db, settings.cache_ttl_days)?;
    let search = build_search(cache.clone(), settings.play_pause)?;
    let installs = build_installs(
        config.keys.appstorespy_key.as_deref(),
        cache,
        settings.aspy_pause,
    )?;

    audit::run(
        countries,
        search.as_ref(),
        installs.as_ref(),
        &titles,
        &settings.options,
        out,
    )
    .await
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub selector: CountrySelector,
    pub caps: Vec<u64>,
    /// Everything but the upper cap, which comes from `caps`.
    pub rank: RankOptions,
    pub rank_out: Option<PathBuf>,
    pub fetch: FetchOptions,
    pub audit: AuditSettings,
    /// Directory for every file the pipeline writes.
    pub out_dir: PathBuf,
}

/// Run every stage. Returns the ranked files written.
pub async fn run(config: &Config, opts: &RunOptions) -> Result<Vec<PathBuf>> {
    config.require_keys()?;
    println!("Keys: {}", config.masked_summary());

    let countries = opts.selector.countries();
    let fetch_opts = FetchOptions {
        out_dir: opts.out_dir.clone(),
        ..opts.fetch.clone()
    };

    // 1. Volumes
    let client = KeywordToolClient::new(config.require_keywordtool()?, fetch_opts.timeout)?;
    fetch::run(&client, &countries, &fetch_opts).await?;

    // 2. Audit
    let audit_path = opts.out_dir.join(DEFAULT_AUDIT_FILE);
    run_audit(config, &opts.audit, &countries, &audit_path).await?;

    // 3. Rank, once per cap
    let caps: Vec<Option<u64>> = if opts.caps.is_empty() {
        vec![None]
    } else {
        opts.caps.iter().copied().map(Some).collect()
    };

    let mut written = Vec::new();
    for cap in &caps {
        let name = output_name(
            opts.selector.label(),
            *cap,
            opts.rank_out.as_deref(),
            opts.caps.len(),
        );
        let out = opts.out_dir.join(name);
        let rank_opts = RankOptions {
            cap: *cap,
            ..opts.rank.clone()
        };
        let rows = rank::run(&audit_path, &opts.out_dir, &countries, &rank_opts, &out)?;
        terminal::display_ranked(&out.display().to_string(), &rows, 20);
        written.push(out);
    }

    println!("\nPipeline done. Output: {}", display_paths(&written));
    Ok(written)
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
