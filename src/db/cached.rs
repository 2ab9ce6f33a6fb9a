// Caching decorators for the two lookup seams.
//
// Each wraps an inner `StoreSearch` / `InstallsSource` and consults the
// ResponseCache first. Cache failures are logged and fall through to the
// inner source; a cache hit skips the inner source and its pacing.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::cache::ResponseCache;
use crate::appstorespy::InstallsSource;
use crate::models::{AppMeta, Candidate};
use crate::play::{SearchQuery, StoreSearch};

/// Namespace for Play search results.
pub const PLAY_SEARCH: &str = "play_search";
/// Namespace for AppstoreSpy metadata.
pub const ASPY_META: &str = "aspy_meta";

pub struct CachedSearch<S> {
    inner: S,
    cache: Arc<ResponseCache>,
}

impl<S: StoreSearch> CachedSearch<S> {
    pub fn new(inner: S, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: StoreSearch> StoreSearch for CachedSearch<S> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        let key = query.cache_key();
        match self.cache.get::<Vec<Candidate>>(PLAY_SEARCH, &key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Cache read failed"),
        }

        let found = self.inner.search(query).await?;
        // Empty results are usually a scrape failure; don't pin them.
        if !found.is_empty() {
            if let Err(e) = self.cache.put(PLAY_SEARCH, &key, &found).await {
                warn!(key = %key, error = %e, "Cache write failed");
            }
        }
        Ok(found)
    }
}

pub struct CachedInstalls<S> {
    inner: S,
    cache: Arc<ResponseCache>,
}

impl<S: InstallsSource> CachedInstalls<S> {
    pub fn new(inner: S, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: InstallsSource> InstallsSource for CachedInstalls<S> {
    async fn app_meta(&self, app_id: &str) -> Result<AppMeta> {
        match self.cache.get::<AppMeta>(ASPY_META, app_id).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => warn!(app_id, error = %e, "Cache read failed"),
        }

        let meta = self.inner.app_meta(app_id).await?;
        if let Err(e) = self.cache.put(ASPY_META, app_id, &meta).await {
            warn!(app_id, error = %e, "Cache write failed");
        }
        Ok(meta)
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }
}
