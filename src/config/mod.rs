//! Configuration module for Coach-Scraper
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. The merged configuration is validated once before any
//! work starts.
//!
//! # Example
//!
//! ```no_run
//! use coach_scraper::config::load_config;
//! use coach_scraper::Site;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("coach-scraper.toml")).unwrap();
//! let lichess = config.site_settings(Site::Lichess);
//! println!("Will page through at most {} listings", lichess.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, SiteConfig, SiteSettings, SitesConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
