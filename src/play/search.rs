use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::Candidate;
use crate::rate_limit::RateLimiter;

/// Public search page.
pub const SEARCH_URL: &str = "https://play.google.com/store/search";

const SERVICE: &str = "Google Play";

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a[^>]*href="/store/apps/details\?id=([A-Za-z0-9_.]+)[^"]*"[^>]*>(.*?)</a>"#)
        .expect("static regex")
});
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"details\?id=([A-Za-z0-9_.]+)").expect("static regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));

/// One search: keyword, locale and how many results to keep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub keyword: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Store country (`gl`), lowercase.
    pub country: String,
    pub top_n: usize,
}

impl SearchQuery {
    /// Stable cache key for this query.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.keyword, self.language, self.country, self.top_n
        )
    }
}

/// Anything that can list store candidates for a keyword.
#[async_trait]
pub trait StoreSearch: Send + Sync {
    /// Up to `query.top_n` candidates in store ranking order. Failures
    /// are reported as an empty list by implementations that can't do
    /// better; only infrastructure errors are returned.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>>;
}

/// Scraper for the public Play search page.
pub struct GooglePlaySearch {
    client: reqwest::Client,
    search_url: String,
    rate_limiter: RateLimiter,
    /// Attempts before giving up (locale first, then without locale).
    attempts: u32,
    retry_pause: Duration,
}

impl GooglePlaySearch {
    pub fn new(pause: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) keyword-pipeline")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            search_url: SEARCH_URL.to_string(),
            rate_limiter: RateLimiter::pacing(pause),
            attempts: 2,
            retry_pause: Duration::from_millis(500),
        })
    }

    pub fn with_search_url(mut self, url: &str) -> Self {
        self.search_url = url.to_string();
        self
    }

    async fn fetch_page(&self, keyword: &str, locale: Option<(&str, &str)>) -> Result<String, ApiError> {
        self.rate_limiter.acquire().await;

        let mut params = vec![("q", keyword.to_string()), ("c", "apps".to_string())];
        if let Some((hl, gl)) = locale {
            params.push(("hl", hl.to_string()));
            params.push(("gl", gl.to_uppercase()));
        }

        let response = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(SERVICE, status.as_u16(), ""));
        }

        response.text().await.map_err(|source| ApiError::Transport {
            service: SERVICE,
            source,
        })
    }
}

#[async_trait]
impl StoreSearch for GooglePlaySearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        for attempt in 1..=self.attempts.max(1) {
            let localized = self
                .fetch_page(&query.keyword, Some((&query.language, &query.country)))
                .await;

            let page = match localized {
                Ok(page) => Some(page),
                Err(e) => {
                    debug!(keyword = %query.keyword, attempt, error = %e, "Localized Play search failed");
                    tokio::time::sleep(self.retry_pause * attempt).await;
                    match self.fetch_page(&query.keyword, None).await {
                        Ok(page) => Some(page),
                        Err(e) => {
                            warn!(keyword = %query.keyword, attempt, error = %e, "Play search failed");
                            None
                        }
                    }
                }
            };

            let found = page
                .map(|html| parse_search_page(&html, query.top_n))
                .unwrap_or_default();
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}

fn decode_entities(s: &str) -> String {
    // `&amp;` last, so `&amp;lt;` stays `&lt;`.
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Extract candidates from a search results page.
///
/// App ids are taken in first-appearance order and de-duplicated. The
/// title is the first non-empty link text seen for that id, else the id.
pub fn parse_search_page(html: &str, top_n: usize) -> Vec<Candidate> {
    let mut titles: HashMap<&str, String> = HashMap::new();
    for caps in LINK_RE.captures_iter(html) {
        let (Some(id), Some(inner)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let text = decode_entities(&TAG_RE.replace_all(inner.as_str(), " "));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            titles.entry(id.as_str()).or_insert(text);
        }
    }

    let mut seen = std::collections::HashSet::new();
    ID_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|id| seen.insert(*id))
        .take(top_n)
        .map(|id| {
            let title = titles.get(id).map(String::as_str).unwrap_or(id);
            Candidate::new(id, title)
        })
        .collect()
}
