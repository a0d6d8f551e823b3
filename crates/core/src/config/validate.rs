use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Scraper base URL and site URL are set
/// - Scraper timeout is not 0
/// - Sitemap chunk and browse page sizes are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.scraper.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "scraper.base_url cannot be empty".to_string(),
        ));
    }

    if config.scraper.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scraper.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.site.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "site.url cannot be empty".to_string(),
        ));
    }

    if config.sitemap.urls_per_chunk == 0 {
        return Err(ConfigError::ValidationError(
            "sitemap.urls_per_chunk cannot be 0".to_string(),
        ));
    }

    if config.sitemap.browse_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "sitemap.browse_page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
