//! Crawler module for the fetch-extract-load pipeline
//!
//! This module contains the core scraping logic, including:
//! - Rate-limited HTTP fetching
//! - Cache-first listing pagination
//! - Per-coach document download
//! - The extraction/persistence worker pool
//! - Overall run coordination

mod coordinator;
mod downloader;
mod fetcher;
mod paginator;
mod queue;

pub use coordinator::{run_scrape, Pipeline, PipelineReport};
pub use downloader::{DownloadOutcome, Downloader};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use paginator::{PageListing, Paginator, PaginatorState};
pub use queue::{QueueStats, WorkQueue};
