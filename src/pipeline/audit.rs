// Competitor audit: for every canonical brand of a country, find the Play
// app with the most installs/day and whether the operator already uses the
// brand.
//
// Brands run sequentially. Enrichment of one brand's candidates may run
// with bounded concurrency; `buffered` keeps candidate order so competitor
// selection and the candidate bundle are deterministic.

use std::path::Path;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::appstorespy::InstallsSource;
use crate::catalog::{self, Country};
use crate::keyapp::usage::brand_used;
use crate::models::{AuditRow, Candidate, EnrichedCandidate};
use crate::output::{csv, terminal};
use crate::play::{SearchQuery, StoreSearch};

/// Default audit output file.
pub const DEFAULT_AUDIT_FILE: &str = "niche_competitors_keyapp.csv";

#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    /// Play results to consider per brand.
    pub top_n: usize,
    /// Candidates enriched in parallel per brand (at least 1).
    pub concurrency: usize,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            concurrency: 1,
        }
    }
}

/// Whole installs, if the figure is usable.
fn whole_installs(daily: Option<f64>) -> Option<i64> {
    daily.filter(|d| d.is_finite()).map(|d| d.trunc() as i64)
}

/// The candidate with the highest known installs/day (first one wins
/// ties); the first candidate when none is known; `None` when empty.
pub fn select_competitor(enriched: &[EnrichedCandidate]) -> Option<&EnrichedCandidate> {
    let mut best: Option<(&EnrichedCandidate, f64)> = None;
    for e in enriched {
        if let Some(daily) = e.meta.daily_installs {
            match best {
                Some((_, top)) if daily <= top => {}
                _ => best = Some((e, daily)),
            }
        }
    }
    best.map(|(e, _)| e).or_else(|| enriched.first())
}

/// `Title::installs::banned` for every candidate, joined by `; `.
/// Unknown installs and not-banned both render as `-`; empty input is `-`.
pub fn candidate_bundle(enriched: &[EnrichedCandidate]) -> String {
    if enriched.is_empty() {
        return "-".to_string();
    }
    enriched
        .iter()
        .map(|e| {
            let installs = whole_installs(e.meta.daily_installs)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let banned = if e.meta.banned == Some(true) { "banned" } else { "-" };
            format!("{}::{installs}::{banned}", e.candidate.title)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Assemble the audit row for one brand.
pub fn build_row(keyword: &str, country: &str, enriched: &[EnrichedCandidate], used: bool) -> AuditRow {
    let top = select_competitor(enriched);

    AuditRow {
        keyword: keyword.to_string(),
        competitor: top
            .map(|e| e.candidate.url.clone())
            .unwrap_or_else(|| "-".to_string()),
        used,
        country: country.to_string(),
        installs_daily: top
            .and_then(|e| whole_installs(e.meta.daily_installs))
            .and_then(|d| u64::try_from(d).ok()),
        competitor_banned: top.is_some_and(|e| e.meta.banned == Some(true)),
        candidates: candidate_bundle(enriched),
    }
}

async fn enrich(
    candidates: Vec<Candidate>,
    installs: &dyn InstallsSource,
    concurrency: usize,
) -> Vec<EnrichedCandidate> {
    if !installs.is_enabled() {
        return candidates
            .into_iter()
            .map(|candidate| EnrichedCandidate {
                candidate,
                meta: Default::default(),
            })
            .collect();
    }

    stream::iter(candidates)
        .map(|candidate| async move {
            let meta = match installs.app_meta(&candidate.app_id).await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(app_id = %candidate.app_id, error = %e, "Enrichment failed");
                    Default::default()
                }
            };
            EnrichedCandidate { candidate, meta }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Audit every canonical brand of one country.
pub async fn audit_country(
    country: &Country,
    search: &dyn StoreSearch,
    installs: &dyn InstallsSource,
    titles: &[String],
    opts: &AuditOptions,
) -> Result<Vec<AuditRow>> {
    let brands = catalog::canonical_list(country.code)?;
    let pb = terminal::progress_bar(brands.len() as u64, country.title);

    let mut rows = Vec::with_capacity(brands.len());
    for brand in brands {
        let query = SearchQuery {
            keyword: brand.clone(),
            language: country.language.to_string(),
            country: country.code.to_string(),
            top_n: opts.top_n,
        };
        let candidates = match search.search(&query).await {
            Ok(c) => c,
            Err(e) => {
                warn!(brand = %brand, error = %e, "Play search failed");
                Vec::new()
            }
        };

        let enriched = enrich(candidates, installs, opts.concurrency).await;
        rows.push(build_row(brand, country.code, &enriched, brand_used(brand, titles)));
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        country = country.code,
        brands = rows.len(),
        with_competitor = rows.iter().filter(|r| r.has_competitor()).count(),
        "Audit complete"
    );
    Ok(rows)
}

/// Audit each country in order and write the combined CSV to `out`.
pub async fn run(
    countries: &[&'static Country],
    search: &dyn StoreSearch,
    installs: &dyn InstallsSource,
    titles: &[String],
    opts: &AuditOptions,
    out: &Path,
) -> Result<Vec<AuditRow>> {
    let mut all_rows = Vec::new();
    for country in countries {
        let rows = audit_country(country, search, installs, titles, opts).await?;
        terminal::display_audit_summary(country.code, &rows);
        all_rows.extend(rows);
    }

    csv::write_rows(out, csv::AUDIT_HEADER, &all_rows)?;
    println!("Saved: {}", out.display());
    Ok(all_rows)
}
