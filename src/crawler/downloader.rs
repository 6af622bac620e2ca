//! Per-coach document download
//!
//! Fetches only the documents a coach is still missing from the cache. All
//! missing documents of one coach share a single rate-limit wait and are
//! requested concurrently.

use crate::cache::CacheStore;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::site::{ArtifactRequest, SiteRules};
use futures_util::future::join_all;
use std::sync::Arc;

/// What [`Downloader::ensure_artifacts`] did for one coach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Documents fetched and cached
    pub fetched: usize,
    /// Documents that were already cached
    pub cached: usize,
    /// Documents whose fetch or cache write failed
    pub failed: usize,
}

impl DownloadOutcome {
    /// True if the network was not touched
    pub fn fully_cached(&self) -> bool {
        self.fetched == 0 && self.failed == 0
    }
}

/// Downloads per-coach documents for one site
pub struct Downloader {
    rules: &'static SiteRules,
    base_url: String,
    fetcher: Arc<Fetcher>,
    cache: CacheStore,
}

impl Downloader {
    pub fn new(
        rules: &'static SiteRules,
        base_url: impl Into<String>,
        fetcher: Arc<Fetcher>,
        cache: CacheStore,
    ) -> Self {
        Self {
            rules,
            base_url: base_url.into(),
            fetcher,
            cache,
        }
    }

    /// Makes sure every document the coach needs is cached
    ///
    /// Failures are logged and leave the document absent; they never fail
    /// the coach as a whole.
    pub async fn ensure_artifacts(&self, identity: &str) -> DownloadOutcome {
        let requests = (self.rules.artifacts)(&self.base_url, identity);
        let total = requests.len();

        let mut missing: Vec<ArtifactRequest> = Vec::with_capacity(total);
        for request in requests {
            if !self.cache.has_artifact(identity, &request.name).await {
                missing.push(request);
            }
        }

        let mut outcome = DownloadOutcome {
            cached: total - missing.len(),
            ..Default::default()
        };

        if missing.is_empty() {
            tracing::debug!("{}: {} already cached", self.rules.site, identity);
            return outcome;
        }

        self.fetcher.rate_limit_gate().await;

        let results = join_all(
            missing
                .iter()
                .map(|request| self.download(identity, request)),
        )
        .await;

        for ok in results {
            if ok {
                outcome.fetched += 1;
            } else {
                outcome.failed += 1;
            }
        }

        if outcome.failed == 0 {
            tracing::info!(
                "{}: downloaded {} ({} documents)",
                self.rules.site,
                identity,
                outcome.fetched
            );
        } else {
            tracing::warn!(
                "{}: downloaded {} with {} of {} documents missing",
                self.rules.site,
                identity,
                outcome.failed,
                missing.len()
            );
        }

        outcome
    }

    async fn download(&self, identity: &str, request: &ArtifactRequest) -> bool {
        let body = match self.fetcher.fetch(&request.url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                tracing::warn!(
                    "{}: {} for {} failed (HTTP {})",
                    self.rules.site,
                    request.name,
                    identity,
                    status_code
                );
                return false;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!(
                    "{}: {} for {} failed: {}",
                    self.rules.site,
                    request.name,
                    identity,
                    error
                );
                return false;
            }
        };

        match self
            .cache
            .write_artifact(identity, &request.name, &body)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "{}: failed to cache {} for {}: {}",
                    self.rules.site,
                    request.name,
                    identity,
                    e
                );
                false
            }
        }
    }
}
