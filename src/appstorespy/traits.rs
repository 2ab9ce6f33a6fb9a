use anyhow::Result;
use async_trait::async_trait;

use crate::models::AppMeta;

/// Anything that can report installs/day and banned status for an app id.
#[async_trait]
pub trait InstallsSource: Send + Sync {
    /// Look up one app. Unknown fields come back as `None`; only
    /// infrastructure failures (e.g. the cache) are errors.
    async fn app_meta(&self, app_id: &str) -> Result<AppMeta>;

    /// Whether this source contributes anything. The audit skips the
    /// enrichment pause entirely when it doesn't.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Source used when no AppstoreSpy key is set: everything unknown.
pub struct NoopInstalls;

#[async_trait]
impl InstallsSource for NoopInstalls {
    async fn app_meta(&self, _app_id: &str) -> Result<AppMeta> {
        Ok(AppMeta::default())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
