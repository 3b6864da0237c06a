use crate::harvest::{
    DEFAULT_EXCLUDE_KEYWORDS, DEFAULT_INCLUDE_KEYWORDS, DEFAULT_MIN_CONTENT_LENGTH,
};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for hdl-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration for `seed_url` restricted to `domain`, with
    /// every other setting at its default
    pub fn for_site(seed_url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::new(seed_url, domain),
            harvest: HarvestConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl stage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Page the breadth-first walk starts from (depth 0)
    pub seed_url: String,

    /// Registrable domain; hosts must equal it or end in `.<domain>`
    pub domain: String,

    /// Pages deeper than this are never fetched
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Minimum pause between consecutive requests (milliseconds)
    #[serde(default = "default_crawl_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Path suffix identifying resource links
    #[serde(default = "default_resource_extension")]
    pub resource_extension: String,

    /// Path suffixes identifying navigable pages (a trailing `/` always counts)
    #[serde(default = "default_page_extensions")]
    pub page_extensions: Vec<String>,
}

impl CrawlerConfig {
    pub fn new(seed_url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            domain: domain.into(),
            max_depth: default_max_depth(),
            request_delay_ms: default_crawl_delay_ms(),
            request_timeout_ms: default_timeout_ms(),
            resource_extension: default_resource_extension(),
            page_extensions: default_page_extensions(),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Harvest stage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarvestConfig {
    /// Minimum pause between consecutive resource fetches (milliseconds)
    #[serde(default = "default_harvest_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Trimmed content shorter than this many characters is rejected
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Filename markers that reject a resource outright
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    /// Vocabulary that accepts a resource by filename or whole word in content
    #[serde(default = "default_include_keywords")]
    pub include_keywords: Vec<String>,

    /// Prompt sentence; `{title}` is replaced by the title-cased filename
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Provenance source tag written into every record
    #[serde(default = "default_source_tag")]
    pub source_tag: String,

    /// Provenance category tag written into every record
    #[serde(default = "default_category_tag")]
    pub category_tag: String,
}

impl HarvestConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_harvest_delay_ms(),
            request_timeout_ms: default_timeout_ms(),
            min_content_length: default_min_content_length(),
            exclude_keywords: default_exclude_keywords(),
            include_keywords: default_include_keywords(),
            prompt_template: default_prompt_template(),
            source_tag: default_source_tag(),
            category_tag: default_category_tag(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/hdl-harvest/hdl-harvest".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Resource-link store, one URL per line
    pub links_path: String,

    /// Dataset store, one JSON record per line
    pub dataset_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            links_path: "data/processed/asicworld_vlinks.txt".to_string(),
            dataset_path: "data/raw/raw_asicworld_crawled.jsonl".to_string(),
        }
    }
}

fn default_max_depth() -> u32 {
    4
}

fn default_crawl_delay_ms() -> u64 {
    1000
}

fn default_harvest_delay_ms() -> u64 {
    700
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_resource_extension() -> String {
    ".v".to_string()
}

fn default_page_extensions() -> Vec<String> {
    vec![".html".to_string()]
}

fn default_min_content_length() -> usize {
    DEFAULT_MIN_CONTENT_LENGTH
}

fn default_exclude_keywords() -> Vec<String> {
    DEFAULT_EXCLUDE_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_include_keywords() -> Vec<String> {
    DEFAULT_INCLUDE_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_prompt_template() -> String {
    "Write Verilog code for {title}.".to_string()
}

fn default_source_tag() -> String {
    "asic-world".to_string()
}

fn default_category_tag() -> String {
    "auto-crawled".to_string()
}
