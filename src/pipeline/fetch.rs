// Volume fetch: every keyword for a country through KeywordTool, folded onto
// canonical brands and written to `<cc>_results.csv`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{self, Country};
use crate::keywordtool::aggregate::aggregate_to_canonical;
use crate::keywordtool::client::{batches, validate_batch_size, KeywordToolClient, MetricsNetwork};
use crate::keywordtool::parse::flatten_results;
use crate::models::VolumeRow;
use crate::output::{csv, terminal};
use crate::rate_limit::{RateLimiter, RetryPolicy};

/// Name of the combined file written when more than one country ran.
pub const ALL_RESULTS_FILE: &str = "all_results.csv";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub batch_size: usize,
    pub network: MetricsNetwork,
    /// Query spelling variants too, not just canonical names.
    pub variants: bool,
    /// Pause between batches.
    pub pause: Duration,
    pub retry: RetryPolicy,
    /// Per-request timeout.
    pub timeout: Duration,
    pub skip_health: bool,
    pub out_dir: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            batch_size: 700,
            network: MetricsNetwork::GoogleSearch,
            variants: true,
            pause: Duration::from_millis(700),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(60),
            skip_health: false,
            out_dir: PathBuf::from("."),
        }
    }
}

/// `<dir>/<cc>_results.csv`.
pub fn result_path(dir: &Path, code: &str) -> PathBuf {
    dir.join(format!("{}_results.csv", code.to_lowercase()))
}

/// Keywords to query for a country.
pub fn keywords_for(country: &Country, variants: bool) -> Result<Vec<String>> {
    let keywords = if variants {
        catalog::all_variants(country.code)?
    } else {
        catalog::canonical_list(country.code)?.to_vec()
    };
    Ok(keywords)
}

/// Fetch, aggregate and write one country. Returns the canonical rows.
pub async fn fetch_for_country(
    client: &KeywordToolClient,
    country: &Country,
    opts: &FetchOptions,
) -> Result<Vec<VolumeRow>> {
    let keywords = keywords_for(country, opts.variants)?;
    let chunks: Vec<&[String]> = batches(&keywords, opts.batch_size)?.collect();
    println!(
        "{} keywords total (to query): {}",
        country.code.to_uppercase(),
        keywords.len()
    );

    let limiter = RateLimiter::pacing(opts.pause);
    let pb = terminal::progress_bar(chunks.len() as u64, "Batches");

    let mut variant_rows = Vec::new();
    for chunk in chunks {
        let data = client
            .fetch_volumes(&limiter, opts.retry, country, chunk, opts.network)
            .await
            .with_context(|| format!("KeywordTool request failed for {}", country.code))?;
        variant_rows.extend(flatten_results(&data, country.code, country.language));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let rows = aggregate_to_canonical(&variant_rows, country.code);
    info!(
        country = country.code,
        variants = variant_rows.len(),
        canonical = rows.len(),
        "Volumes aggregated"
    );

    let path = result_path(&opts.out_dir, country.code);
    csv::write_rows(&path, csv::VOLUME_HEADER, &rows)?;
    terminal::display_top_volumes(
        &format!("{} ({})", country.title, country.language),
        &rows,
        10,
    );
    println!("Saved: {}", path.display());

    Ok(rows)
}

/// Fetch every selected country in order. Writes `all_results.csv` as well
/// when more than one country ran.
pub async fn run(
    client: &KeywordToolClient,
    countries: &[&'static Country],
    opts: &FetchOptions,
) -> Result<Vec<VolumeRow>> {
    validate_batch_size(opts.batch_size)?;

    if !opts.skip_health {
        client.health_check(countries).await;
    }

    let mut all_rows = Vec::new();
    for country in countries {
        all_rows.extend(fetch_for_country(client, country, opts).await?);
    }

    if countries.len() > 1 {
        let path = opts.out_dir.join(ALL_RESULTS_FILE);
        csv::write_rows(&path, csv::VOLUME_HEADER, &all_rows)?;
        println!("Saved: {}", path.display());
    }

    Ok(all_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_path_uses_lowercase_code() {
        assert_eq!(
            result_path(Path::new("out"), "BR"),
            PathBuf::from("out/br_results.csv")
        );
    }

    #[test]
    fn canonical_only_is_a_subset_of_variants() {
        let br = catalog::country("br").unwrap();
        let canon = keywords_for(br, false).unwrap();
        let all = keywords_for(br, true).unwrap();
        assert!(all.len() >= canon.len());
        assert!(canon.iter().all(|c| all.contains(c)));
    }
}
