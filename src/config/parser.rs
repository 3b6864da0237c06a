use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that output files can be traced back to the
/// configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let config_content = r#"
[crawler]
seed-url = "https://www.asic-world.com/"
domain = "asic-world.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 4);
        assert_eq!(config.crawler.request_delay_ms, 1000);
        assert_eq!(config.crawler.request_timeout_ms, 10_000);
        assert_eq!(config.crawler.resource_extension, ".v");
        assert_eq!(config.crawler.page_extensions, vec![".html".to_string()]);
        assert_eq!(config.harvest.request_delay_ms, 700);
        assert_eq!(config.harvest.min_content_length, 30);
        assert!(config.harvest.exclude_keywords.contains(&"tb".to_string()));
        assert!(config.harvest.include_keywords.contains(&"adder".to_string()));
        assert_eq!(
            config.output.links_path,
            "data/processed/asicworld_vlinks.txt"
        );
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[crawler]
seed-url = "https://docs.example.org/index.html"
domain = "example.org"
max-depth = 2
request-delay-ms = 250
request-timeout-ms = 5000
resource-extension = ".sv"
page-extensions = [".html", ".htm"]

[harvest]
request-delay-ms = 100
min-content-length = 50
exclude-keywords = ["tb"]
include-keywords = ["fifo", "uart"]
prompt-template = "Write SystemVerilog for {title}."
source-tag = "example"
category-tag = "manual"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
links-path = "./links.txt"
dataset-path = "./dataset.jsonl"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.page_extensions.len(), 2);
        assert_eq!(config.harvest.include_keywords, vec!["fifo", "uart"]);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.dataset_path, "./dataset.jsonl");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_seed() {
        let file = create_temp_config("[crawler]\ndomain = \"example.com\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
seed-url = "https://evil.example/"
domain = "asic-world.com"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
