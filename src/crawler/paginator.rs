//! Listing pagination
//!
//! Walks a site's coach directory page by page, cache first. The walk ends
//! when the page counter passes the configured maximum or when a freshly
//! fetched page lists nobody.

use crate::cache::CacheStore;
use crate::config::SiteSettings;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::site::SiteRules;
use std::sync::Arc;

/// Where the paginator is in its walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// More pages may follow
    Advancing,
    /// A fetched page listed no coaches
    Exhausted,
    /// The page counter passed the maximum
    Done,
}

impl PaginatorState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Advancing)
    }
}

/// Outcome of visiting one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageListing {
    /// Read from the cache without touching the network
    Cached(Vec<String>),
    /// Fetched, parsed and cached
    Fetched(Vec<String>),
    /// The fetch failed; nothing was cached and the page is retried next run
    Skipped { status_code: Option<u16> },
    /// The walk is over
    End,
}

/// Page-by-page walker over one site's listing
pub struct Paginator {
    rules: &'static SiteRules,
    base_url: String,
    max_pages: u32,
    fetcher: Arc<Fetcher>,
    cache: CacheStore,
    page_no: u32,
    state: PaginatorState,
}

impl Paginator {
    pub fn new(settings: &SiteSettings, fetcher: Arc<Fetcher>, cache: CacheStore) -> Self {
        Self {
            rules: settings.site.rules(),
            base_url: settings.base_url.clone(),
            max_pages: settings.max_pages,
            fetcher,
            cache,
            page_no: 1,
            state: PaginatorState::Advancing,
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// Number of the page the next call will visit
    pub fn page_no(&self) -> u32 {
        self.page_no
    }

    /// Visits the current page and advances the counter
    ///
    /// Once a terminal state is reached every further call returns
    /// [`PageListing::End`] without side effects.
    pub async fn next_page(&mut self) -> PageListing {
        if self.state.is_terminal() {
            return PageListing::End;
        }

        let page_no = self.page_no;
        if page_no > self.max_pages {
            tracing::info!(
                "{}: reached page limit ({}), stopping",
                self.rules.site,
                self.max_pages
            );
            self.state = PaginatorState::Done;
            return PageListing::End;
        }
        self.page_no += 1;

        match self.cache.read_page(page_no).await {
            Ok(Some(identities)) if identities.is_empty() => {
                // Only a live exhaustion writes an empty page
                tracing::info!(
                    "{}: page {} cached as empty, listing exhausted",
                    self.rules.site,
                    page_no
                );
                self.state = PaginatorState::Exhausted;
                return PageListing::End;
            }
            Ok(Some(identities)) => {
                tracing::info!(
                    "{}: page {} cached ({} coaches)",
                    self.rules.site,
                    page_no,
                    identities.len()
                );
                return PageListing::Cached(identities);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "{}: unreadable cached page {}, fetching again: {}",
                    self.rules.site,
                    page_no,
                    e
                );
            }
        }

        self.fetch_page(page_no).await
    }

    async fn fetch_page(&mut self, page_no: u32) -> PageListing {
        let url = (self.rules.listing_url)(&self.base_url, page_no);

        self.fetcher.rate_limit_gate().await;
        let body = match self.fetcher.fetch(&url).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                let status_code = failure.status_code();
                match &failure {
                    FetchResult::NetworkError { error } => tracing::warn!(
                        "{}: skipping page {} ({})",
                        self.rules.site,
                        page_no,
                        error
                    ),
                    _ => tracing::warn!(
                        "{}: skipping page {} (HTTP {})",
                        self.rules.site,
                        page_no,
                        status_code.unwrap_or_default()
                    ),
                }
                return PageListing::Skipped { status_code };
            }
        };

        let identities = (self.rules.parse_listing)(&body);

        if let Err(e) = self.cache.write_page(page_no, &identities).await {
            tracing::warn!(
                "{}: failed to cache page {}: {}",
                self.rules.site,
                page_no,
                e
            );
        }

        if identities.is_empty() {
            tracing::info!(
                "{}: page {} lists no coaches, listing exhausted",
                self.rules.site,
                page_no
            );
            self.state = PaginatorState::Exhausted;
            return PageListing::End;
        }

        tracing::info!(
            "{}: page {} fetched ({} coaches)",
            self.rules.site,
            page_no,
            identities.len()
        );
        PageListing::Fetched(identities)
    }
}
