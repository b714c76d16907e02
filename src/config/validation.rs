use crate::config::types::{Config, CrawlerConfig, ParserConfig, SearchConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound the marketplace accepts for `n`
const MAX_PAGE_SIZE: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_parser_config(&config.parser)?;
    Ok(())
}

/// Validates search endpoint and defaults
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if endpoint.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must not carry a query string",
            config.endpoint
        )));
    }

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.default_sort_field.is_empty() || config.default_sort_order.is_empty() {
        return Err(ConfigError::Validation(
            "default sort field and order cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates sentinel phrases
fn validate_parser_config(config: &ParserConfig) -> Result<(), ConfigError> {
    // An empty sentinel would match every page
    if config.no_results_text.is_empty() || config.fallback_text.is_empty() {
        return Err(ConfigError::Validation(
            "sentinel texts cannot be empty".to_string(),
        ));
    }

    Ok(())
}
