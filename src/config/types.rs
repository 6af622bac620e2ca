use crate::site::Site;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Coach-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub sites: SitesConfig,
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Root of the document cache
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Number of extraction/persistence workers per site
    pub workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            workers: 5,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Operator contact embedded in every outbound User-Agent header
    pub contact: String,
}

impl UserAgentConfig {
    /// Formats the outbound User-Agent header value
    pub fn header_value(&self) -> String {
        format!("BoardWise coach-scraper ({})", self.contact)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Per-site overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    pub chesscom: SiteConfig,
    pub lichess: SiteConfig,
}

impl SitesConfig {
    pub fn get(&self, site: Site) -> &SiteConfig {
        match site {
            Site::Chesscom => &self.chesscom,
            Site::Lichess => &self.lichess,
        }
    }
}

/// Overrides for one site; unset values fall back to the site's rules
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Hard upper bound on listing pages visited per run
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Pause between request-bearing operations (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: Option<u64>,
}

/// Fully resolved settings for one site's pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub site: Site,
    pub base_url: String,
    pub max_pages: u32,
    pub request_delay: Duration,
}

impl Config {
    /// Resolves a site's settings, filling gaps from its static rules
    pub fn site_settings(&self, site: Site) -> SiteSettings {
        let rules = site.rules();
        let overrides = self.sites.get(site);

        SiteSettings {
            site,
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| rules.default_base_url.to_string()),
            max_pages: overrides.max_pages.unwrap_or(rules.default_max_pages),
            request_delay: overrides
                .request_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(rules.default_request_delay),
        }
    }
}
