// Keyapp REST client (bearer token auth).

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Default Keyapp API base.
pub const DEFAULT_BASE_URL: &str = "https://keyapp.top/api/v2";

const SERVICE: &str = "Keyapp";

/// Fields that may carry an app's display title, in preference order.
const TITLE_FIELDS: &[&str] = &["title", "name", "app_title", "store_title", "appName"];

pub struct KeyappClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl KeyappClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keyword-pipeline/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// GET `/apps`, returning the raw JSON body.
    pub async fn list_apps(&self) -> Result<Value, ApiError> {
        let url = format!("{}/apps", self.base_url);
        debug!(url = %url, "Keyapp GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
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

        response.json().await.map_err(|source| ApiError::Transport {
            service: SERVICE,
            source,
        })
    }

    /// Titles of every app in the account. A failed call is logged and
    /// yields an empty list, so every brand reads as unused.
    pub async fn app_titles(&self) -> Vec<String> {
        match self.list_apps().await {
            Ok(body) => extract_titles(&body),
            Err(e) => {
                warn!(error = %e, "Failed to list Keyapp apps; treating every brand as unused");
                Vec::new()
            }
        }
    }
}

/// Pull titles out of an `/apps` body: either a bare list or an object with
/// an `apps` or `data` list.
pub fn extract_titles(body: &Value) -> Vec<String> {
    let items: &[Value] = match body {
        Value::Array(items) => items,
        Value::Object(map) => ["apps", "data"]
            .iter()
            .filter_map(|k| map.get(*k).and_then(Value::as_array))
            .find(|a| !a.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| {
            TITLE_FIELDS.iter().find_map(|f| match item.get(*f) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
        })
        .collect()
}
