//! Scrape coordinator - pipeline orchestration logic
//!
//! This module ties the pieces of one run together:
//! - Backing up the managed tables and seeding languages, before anything
//!   else touches storage
//! - One independent pipeline per site, all running in parallel
//! - Within a pipeline: paginate, download, enqueue, then drain the workers

use crate::cache::CacheStore;
use crate::config::{validate, Config, SiteSettings};
use crate::crawler::downloader::Downloader;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::paginator::{PageListing, Paginator, PaginatorState};
use crate::crawler::queue::{QueueStats, WorkQueue};
use crate::locale::DetectLanguage;
use crate::site::{Site, SiteRules};
use crate::storage::{PersistenceGateway, Storage};
use crate::{CoachError, Result};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Counters for one site's pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub site: Site,
    pub pages_cached: u32,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub coaches_seen: u64,
    /// Coaches whose documents were all cached already
    pub coaches_cached: u64,
    /// Documents that could not be fetched or cached
    pub artifact_failures: u64,
    /// GETs issued by the pipeline's fetcher
    pub requests: u64,
    pub jobs: QueueStats,
    pub end_state: PaginatorState,
}

impl PipelineReport {
    fn new(site: Site) -> Self {
        Self {
            site,
            pages_cached: 0,
            pages_fetched: 0,
            pages_skipped: 0,
            coaches_seen: 0,
            coaches_cached: 0,
            artifact_failures: 0,
            requests: 0,
            jobs: QueueStats::default(),
            end_state: PaginatorState::Advancing,
        }
    }
}

/// Fetch-extract-load pipeline for a single site
///
/// Owns its fetcher, cache subtree and work queue. Nothing mutable is shared
/// with other sites' pipelines apart from the storage gateway.
pub struct Pipeline<S> {
    settings: SiteSettings,
    fetcher: Arc<Fetcher>,
    cache: CacheStore,
    gateway: PersistenceGateway<S>,
    detector: Arc<dyn DetectLanguage>,
    workers: usize,
}

impl<S: Storage + Send + 'static> Pipeline<S> {
    /// Creates a pipeline instance
    ///
    /// # Arguments
    ///
    /// * `settings` - Resolved settings of the site to scrape
    /// * `client` - HTTP client; the pipeline wraps it in its own fetcher
    /// * `data_dir` - Root of the document cache
    /// * `gateway` - Where extracted records are upserted
    /// * `detector` - Language detection used by extractors that need it
    /// * `workers` - Number of extraction/persistence workers
    pub fn new(
        settings: SiteSettings,
        client: Client,
        data_dir: &Path,
        gateway: PersistenceGateway<S>,
        detector: Arc<dyn DetectLanguage>,
        workers: usize,
    ) -> Self {
        let fetcher = Arc::new(Fetcher::new(client, settings.request_delay));
        let cache = CacheStore::new(data_dir, settings.site);

        Self {
            settings,
            fetcher,
            cache,
            gateway,
            detector,
            workers,
        }
    }

    /// Runs the pipeline until the listing ends and every job has drained
    ///
    /// Per-page and per-coach failures are logged and absorbed. Only an
    /// unusable cache directory or a closed work queue is an error.
    pub async fn run(self) -> Result<PipelineReport> {
        let site = self.settings.site;
        let rules = site.rules();
        let mut report = PipelineReport::new(site);

        tokio::fs::create_dir_all(self.cache.root()).await?;

        tracing::info!(
            "{}: starting (at most {} pages, {} workers)",
            site,
            self.settings.max_pages,
            self.workers
        );

        let mut paginator = Paginator::new(
            &self.settings,
            Arc::clone(&self.fetcher),
            self.cache.clone(),
        );
        let downloader = Downloader::new(
            rules,
            self.settings.base_url.clone(),
            Arc::clone(&self.fetcher),
            self.cache.clone(),
        );
        let job = Arc::new(PersistJob {
            rules,
            cache: self.cache.clone(),
            gateway: self.gateway.clone(),
            detector: Arc::clone(&self.detector),
        });
        let queue = WorkQueue::start(
            format!("{}-extract", site),
            self.workers,
            move |identity: String| persist_coach(Arc::clone(&job), identity),
        );

        loop {
            let identities = match paginator.next_page().await {
                PageListing::Cached(identities) => {
                    report.pages_cached += 1;
                    identities
                }
                PageListing::Fetched(identities) => {
                    report.pages_fetched += 1;
                    identities
                }
                PageListing::Skipped { .. } => {
                    report.pages_skipped += 1;
                    continue;
                }
                PageListing::End => break,
            };

            for identity in identities {
                let outcome = downloader.ensure_artifacts(&identity).await;
                report.coaches_seen += 1;
                report.artifact_failures += outcome.failed as u64;
                if outcome.fully_cached() {
                    report.coaches_cached += 1;
                }

                queue.submit(identity)?;
            }
        }

        tracing::info!("{}: listing finished, draining workers", site);
        report.jobs = queue.join().await;
        report.end_state = paginator.state();
        report.requests = self.fetcher.request_count();

        tracing::info!(
            "{}: done ({} coaches stored, {} failed)",
            site,
            report.jobs.completed,
            report.jobs.failed
        );
        tracing::debug!("{}: {:?}", site, report);

        Ok(report)
    }
}

/// Everything a worker needs to turn an identity into a stored row
struct PersistJob<S> {
    rules: &'static SiteRules,
    cache: CacheStore,
    gateway: PersistenceGateway<S>,
    detector: Arc<dyn DetectLanguage>,
}

/// Extracts one coach from the cache, then upserts it
///
/// Extraction parses HTML and the upsert blocks on SQLite, so both run on
/// the blocking pool.
async fn persist_coach<S: Storage + Send + 'static>(
    job: Arc<PersistJob<S>>,
    identity: String,
) -> Result<()> {
    let site = job.rules.site;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let detector = Arc::clone(&job.detector);
        let record = (job.rules.extractor)(&job.cache, &identity, detector).extract();
        job.gateway.upsert(&record)?;
        tracing::debug!("{}: stored {}", site, identity);
        Ok(())
    })
    .await
    .map_err(|e| CoachError::Pipeline {
        site: site.to_string(),
        message: format!("extraction task failed: {}", e),
    })?
}

/// Runs a complete scrape
///
/// 1. Validates the configuration
/// 2. Backs up the managed tables (fatal if the schema is missing)
/// 3. Seeds the languages table
/// 4. Runs one pipeline per requested site, in parallel
///
/// Every pipeline is awaited even if another one fails; the first failure
/// is returned afterwards.
///
/// # Example
///
/// ```no_run
/// use coach_scraper::config::Config;
/// use coach_scraper::crawler::run_scrape;
/// use coach_scraper::locale::WhatlangDetector;
/// use coach_scraper::storage::{open_storage, PersistenceGateway};
/// use coach_scraper::Site;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example(config: Config) -> Result<(), Box<dyn std::error::Error>> {
/// let storage = open_storage(Path::new("coaches.db"))?;
/// let gateway = PersistenceGateway::new(storage);
/// run_scrape(&config, &[Site::Lichess], gateway, Arc::new(WhatlangDetector)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape<S: Storage + Send + 'static>(
    config: &Config,
    sites: &[Site],
    gateway: PersistenceGateway<S>,
    detector: Arc<dyn DetectLanguage>,
) -> Result<Vec<PipelineReport>> {
    validate(config)?;

    let prepare = gateway.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        prepare.backup()?;
        prepare.load_languages()?;
        Ok(())
    })
    .await??;

    let client = build_http_client(&config.user_agent)?;
    let data_dir = Path::new(&config.scraper.data_dir);

    let mut handles = Vec::with_capacity(sites.len());
    for &site in sites {
        let pipeline = Pipeline::new(
            config.site_settings(site),
            client.clone(),
            data_dir,
            gateway.clone(),
            Arc::clone(&detector),
            config.scraper.workers,
        );
        handles.push((site, tokio::spawn(pipeline.run())));
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (site, handle) in handles {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(CoachError::Pipeline {
                site: site.to_string(),
                message: e.to_string(),
            })
        });

        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!("{}: pipeline failed: {}", site, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}
