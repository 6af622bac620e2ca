use crate::config::types::{Config, ScraperConfig, SiteConfig, UserAgentConfig};
use crate::site::Site;
use crate::ConfigError;
use url::Url;

/// Upper bound on workers per site
const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    for site in Site::ALL {
        validate_site_config(site, config.sites.get(site))?;
    }
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.contact.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    if config.contact.chars().any(char::is_control) {
        return Err(ConfigError::Validation(
            "user agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates the overrides of one site
fn validate_site_config(site: Site, config: &SiteConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(format!(
            "{}: max_pages must be >= 1",
            site
        )));
    }

    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("{}: invalid base_url '{}': {}", site, base_url, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: base_url '{}' must use http or https",
                site, base_url
            )));
        }
    }

    Ok(())
}
