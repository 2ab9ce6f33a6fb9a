// AppstoreSpy REST client.
//
// One app lookup touches up to three endpoints: `apps/summary`, then
// `apps/app`, then `apps/trends` only if installs/day is still unknown.
// Each endpoint is best effort; a failed or non-200 call just
// contributes nothing.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::extract::{banned_flag, daily_installs, daily_series};
use super::traits::InstallsSource;
use crate::error::ApiError;
use crate::models::AppMeta;
use crate::rate_limit::RateLimiter;

/// Default AppstoreSpy API base.
pub const DEFAULT_BASE_URL: &str = "https://api.appstorespy.com/v1";

const SERVICE: &str = "AppstoreSpy";

pub struct AppstoreSpyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Paces whole lookups, not individual endpoint calls.
    rate_limiter: RateLimiter,
}

impl AppstoreSpyClient {
    pub fn new(api_key: &str, pause: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keyword-pipeline/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            rate_limiter: RateLimiter::pacing(pause),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// GET `apps/<endpoint>?store=google&app_id=<id>`.
    async fn get(&self, endpoint: &str, app_id: &str) -> Result<Value, ApiError> {
        let url = format!("{}/apps/{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("store", "google"), ("app_id", app_id)])
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(SERVICE, status.as_u16(), &body));
        }

        // An empty or `null` body counts as an empty object.
        let body: Value = response.json().await.map_err(|source| ApiError::Transport {
            service: SERVICE,
            source,
        })?;
        Ok(if body.is_null() {
            Value::Object(Default::default())
        } else {
            body
        })
    }

    async fn get_logged(&self, endpoint: &str, app_id: &str) -> Option<Value> {
        match self.get(endpoint, app_id).await {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(endpoint, app_id, error = %e, "AppstoreSpy endpoint skipped");
                None
            }
        }
    }

    /// Combine summary, app and (if needed) trends into one `AppMeta`.
    pub async fn enrich(&self, app_id: &str) -> AppMeta {
        self.rate_limiter.acquire().await;

        let mut meta = AppMeta::default();

        for endpoint in ["summary", "app"] {
            if let Some(data) = self.get_logged(endpoint, app_id).await {
                merge_endpoint(&mut meta, &data);
            }
        }

        if meta.daily_installs.is_none() {
            if let Some(data) = self.get_logged("trends", app_id).await {
                meta.daily_installs = daily_series(&data).last().copied();
            }
        }

        debug!(
            app_id,
            daily = ?meta.daily_installs,
            banned = ?meta.banned,
            "AppstoreSpy lookup complete"
        );
        meta
    }
}

/// Fold one endpoint's payload into `meta`: installs/day only fills a gap,
/// a definite banned answer always overwrites.
pub fn merge_endpoint(meta: &mut AppMeta, data: &Value) {
    if meta.daily_installs.is_none() {
        meta.daily_installs = daily_installs(data);
    }
    if let Some(banned) = banned_flag(data) {
        meta.banned = Some(banned);
    }
}

#[async_trait]
impl InstallsSource for AppstoreSpyClient {
    async fn app_meta(&self, app_id: &str) -> Result<AppMeta> {
        Ok(self.enrich(app_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_then_app_merge() {
        let mut meta = AppMeta::default();
        merge_endpoint(&mut meta, &json!({"installs_daily": 120, "is_published": true}));
        assert_eq!(meta.daily_installs, Some(120.0));
        assert_eq!(meta.banned, Some(false));

        // The app endpoint can't override a known daily figure but can
        // flip banned.
        merge_endpoint(&mut meta, &json!({"daily_installs": 999, "status": "removed"}));
        assert_eq!(meta.daily_installs, Some(120.0));
        assert_eq!(meta.banned, Some(true));
    }
}
