use crate::config::types::{Config, CrawlerConfig, HarvestConfig, OutputConfig, UserAgentConfig};
use crate::url::matches_domain;
use crate::ConfigError;
use url::Url;

/// Smallest request timeout accepted, in milliseconds
const MIN_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_harvest_config(&config.harvest)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl stage configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_domain_string(&config.domain)?;

    let seed = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            config.seed_url
        )));
    }

    let seed_host = seed.host_str().unwrap_or_default();
    if !matches_domain(&config.domain, seed_host) {
        return Err(ConfigError::Validation(format!(
            "Seed URL host '{}' is outside domain '{}'",
            seed_host, config.domain
        )));
    }

    if config.request_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "crawler request_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.request_timeout_ms
        )));
    }

    validate_extension("resource_extension", &config.resource_extension)?;

    if config.page_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "page_extensions must list at least one extension".to_string(),
        ));
    }

    for ext in &config.page_extensions {
        validate_extension("page_extensions", ext)?;
        if ext.eq_ignore_ascii_case(&config.resource_extension) {
            return Err(ConfigError::Validation(format!(
                "'{}' cannot be both a page and a resource extension",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates harvest stage configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "harvest request_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.request_timeout_ms
        )));
    }

    if config.include_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "include_keywords cannot be empty".to_string(),
        ));
    }

    if config
        .include_keywords
        .iter()
        .chain(config.exclude_keywords.iter())
        .any(|kw| kw.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "keywords cannot be empty strings".to_string(),
        ));
    }

    if !config.prompt_template.contains("{title}") {
        return Err(ConfigError::Validation(format!(
            "prompt_template must contain '{{title}}', got '{}'",
            config.prompt_template
        )));
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.links_path.is_empty() {
        return Err(ConfigError::Validation(
            "links_path cannot be empty".to_string(),
        ));
    }

    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset_path cannot be empty".to_string(),
        ));
    }

    if config.links_path == config.dataset_path {
        return Err(ConfigError::Validation(
            "links_path and dataset_path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates a file extension such as `.v`
fn validate_extension(field: &str, ext: &str) -> Result<(), ConfigError> {
    match ext.strip_prefix('.') {
        Some(rest) if !rest.is_empty() && !rest.contains('/') => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{} entries must look like '.ext', got '{}'",
            field, ext
        ))),
    }
}

/// Validates a domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
