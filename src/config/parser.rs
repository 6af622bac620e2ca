use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Parses a configuration file without validating it
///
/// Use this when the result will be merged with command-line overrides and
/// validated afterwards.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Parsed configuration, with defaults for omitted keys
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads, parses and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use coach_scraper::config::load_config;
///
/// let config = load_config(Path::new("coach-scraper.toml")).unwrap();
/// println!("Workers: {}", config.scraper.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(path)?;
    validate(&config)?;
    Ok(config)
}
