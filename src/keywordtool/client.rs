// HTTP client for the KeywordTool search-volume endpoint.
//
// API docs: https://docs.keywordtool.io/reference/search-volume-google

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{self, Country};
use crate::error::ApiError;
use crate::rate_limit::{with_retry, RateLimiter, RetryPolicy};

use super::parse::results_block;

/// Search-volume endpoint for Google.
pub const DEFAULT_ENDPOINT: &str = "https://api.keywordtool.io/v2/search/volume/google";

/// KeywordTool rejects batches above this size.
pub const MAX_BATCH_SIZE: usize = 1000;

const SERVICE: &str = "KeywordTool";

/// Which Google network the metrics come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetricsNetwork {
    #[value(name = "googlesearch")]
    GoogleSearch,
    #[value(name = "googlesearchnetwork")]
    GoogleSearchNetwork,
}

impl MetricsNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsNetwork::GoogleSearch => "googlesearch",
            MetricsNetwork::GoogleSearchNetwork => "googlesearchnetwork",
        }
    }
}

impl std::fmt::Display for MetricsNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for the search-volume endpoint.
#[derive(Debug, Serialize)]
pub struct VolumeRequest<'a> {
    pub apikey: &'a str,
    pub keyword: &'a [String],
    pub metrics_location: [u32; 1],
    pub metrics_language: [&'a str; 1],
    pub metrics_network: &'a str,
    pub output: &'a str,
}

pub struct KeywordToolClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl KeywordToolClient {
    /// Create a client with the given API key and per-request timeout.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keyword-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout,
        })
    }

    /// Point the client somewhere else (staging, a local stub).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Fetch volumes for one batch, retrying per `policy`.
    pub async fn fetch_volumes(
        &self,
        limiter: &RateLimiter,
        policy: RetryPolicy,
        country: &Country,
        keywords: &[String],
        network: MetricsNetwork,
    ) -> Result<Value, ApiError> {
        self.fetch_volumes_with_timeout(limiter, policy, country, keywords, network, self.timeout)
            .await
    }

    async fn fetch_volumes_with_timeout(
        &self,
        limiter: &RateLimiter,
        policy: RetryPolicy,
        country: &Country,
        keywords: &[String],
        network: MetricsNetwork,
        timeout: Duration,
    ) -> Result<Value, ApiError> {
        let body = VolumeRequest {
            apikey: &self.api_key,
            keyword: keywords,
            metrics_location: [country.location_id],
            metrics_language: [country.language],
            metrics_network: network.as_str(),
            output: "json",
        };

        debug!(
            country = country.code,
            batch = keywords.len(),
            network = network.as_str(),
            "KeywordTool request"
        );

        let body = &body;
        with_retry(limiter, policy, || async move {
            let response = self
                .client
                .post(&self.endpoint)
                .timeout(timeout)
                .json(body)
                .send()
                .await
                .map_err(|source| ApiError::Transport {
                    service: SERVICE,
                    source,
                })?;

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(|source| ApiError::Transport {
                        service: SERVICE,
                        source,
                    });
            }

            let text = response.text().await.unwrap_or_default();
            let err = ApiError::status(SERVICE, status.as_u16(), &text);
            warn!(status = status.as_u16(), error = %err, "KeywordTool API error");
            Err(err)
        })
        .await
    }

    /// Probe the API once globally and once per country. Failures are
    /// printed, never returned.
    pub async fn health_check(&self, countries: &[&Country]) {
        println!("\n--- HEALTH CHECK ---");
        let Some(first) = countries.first() else {
            return;
        };

        let limiter = RateLimiter::pacing(Duration::ZERO);
        let policy = RetryPolicy::new(2, 1.3);
        let timeout = Duration::from_secs(30);

        let probe = vec!["google".to_string(), "facebook".to_string()];
        match self
            .fetch_volumes_with_timeout(
                &limiter,
                policy,
                first,
                &probe,
                MetricsNetwork::GoogleSearchNetwork,
                timeout,
            )
            .await
        {
            Ok(data) => {
                let keys: Vec<String> = match results_block(&data) {
                    Some(Value::Object(map)) => map.keys().take(3).cloned().collect(),
                    Some(Value::Array(_)) => vec!["list".to_string()],
                    _ => Vec::new(),
                };
                println!("[global] ok, sample parsed keys: {keys:?}");
            }
            Err(e) => println!("[global] failed: {e}"),
        }

        for country in countries {
            let sample: Vec<String> = match catalog::canonical_list(country.code) {
                Ok(list) if !list.is_empty() => list.iter().take(3).cloned().collect(),
                _ => vec!["test".to_string()],
            };
            match self
                .fetch_volumes_with_timeout(
                    &limiter,
                    policy,
                    country,
                    &sample,
                    MetricsNetwork::GoogleSearchNetwork,
                    timeout,
                )
                .await
            {
                Ok(data) => {
                    let size = match results_block(&data) {
                        Some(Value::Object(map)) => map.len(),
                        Some(Value::Array(items)) => items.len(),
                        _ => 0,
                    };
                    info!(country = country.code, size, "Health check ok");
                    println!("[{}] ok, sample size: {size}", country.code);
                }
                Err(e) => println!("[{}] failed: {e}", country.code),
            }
        }
    }
}

/// A zero or oversized batch size is a usage error.
pub fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        anyhow::bail!("--batch-size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}");
    }
    Ok(())
}

/// Split keywords into request-sized batches.
pub fn batches(keywords: &[String], batch_size: usize) -> Result<std::slice::Chunks<'_, String>> {
    validate_batch_size(batch_size)?;
    Ok(keywords.chunks(batch_size))
}
