//! Source sites and their scraping rules
//!
//! Each [`Site`] resolves to a static [`SiteRules`] table of plain functions:
//! how to address listing pages, how to read identities off a listing, which
//! per-coach documents to download and how to build an extractor over them.
//! Nothing in the pipeline branches on the site beyond this lookup.

mod chesscom;
mod lichess;

use crate::cache::CacheStore;
use crate::extract::Extractor;
use crate::locale::DetectLanguage;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// A coach directory the scraper knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Chesscom,
    Lichess,
}

impl Site {
    pub const ALL: [Site; 2] = [Self::Chesscom, Self::Lichess];

    /// Name used on the command line, in the cache layout and in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chesscom => "chesscom",
            Self::Lichess => "lichess",
        }
    }

    /// Returns the scraping rules for this site
    pub fn rules(&self) -> &'static SiteRules {
        match self {
            Self::Chesscom => &chesscom::RULES,
            Self::Lichess => &lichess::RULES,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|site| site.as_str() == s)
            .ok_or_else(|| format!("unknown site '{}' (expected chesscom or lichess)", s))
    }
}

/// One per-coach document to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    /// Where to fetch it from
    pub url: String,
    /// File name inside the coach's cache directory
    pub name: String,
}

/// Builds an extractor over the cached documents of one coach
pub type ExtractorFactory =
    fn(&CacheStore, &str, Arc<dyn DetectLanguage>) -> Box<dyn Extractor>;

/// Static per-site rule table
pub struct SiteRules {
    pub site: Site,

    /// Origin all URLs are built from unless overridden in config
    pub default_base_url: &'static str,

    /// Number of listing pages the directory had when last surveyed
    pub default_max_pages: u32,

    /// Pause between request-bearing operations
    pub default_request_delay: Duration,

    /// `(base_url, page_no) -> url` of a listing page
    pub listing_url: fn(&str, u32) -> String,

    /// Reads coach identities off a listing page, in page order
    pub parse_listing: fn(&str) -> Vec<String>,

    /// `(base_url, identity) -> documents` needed for extraction
    pub artifacts: fn(&str, &str) -> Vec<ArtifactRequest>,

    pub extractor: ExtractorFactory,
}

impl fmt::Debug for SiteRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteRules")
            .field("site", &self.site)
            .field("default_base_url", &self.default_base_url)
            .field("default_max_pages", &self.default_max_pages)
            .field("default_request_delay", &self.default_request_delay)
            .finish_non_exhaustive()
    }
}

/// Returns true if the identity is safe to use as a cache directory name
pub fn is_valid_identity(identity: &str) -> bool {
    !identity.is_empty()
        && identity != "."
        && identity != ".."
        && !identity.contains(['/', '\\'])
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Extracts the identity that follows `marker` in a profile link
fn identity_after(href: &str, marker: &str) -> Option<String> {
    let start = href.find(marker)? + marker.len();
    let rest = &href[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let identity = &rest[..end];

    is_valid_identity(identity).then(|| identity.to_string())
}
