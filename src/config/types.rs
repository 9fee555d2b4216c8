use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Doc-Harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Link-acceptance depth ceiling; zero or negative means unlimited
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: i32,

    /// Whether accepted links are fetched and stored in download mode
    #[serde(rename = "download-all", default = "default_download_all")]
    pub download_all: bool,

    /// Keywords that mark two paths as belonging to the same topic
    #[serde(rename = "topic-keywords", default = "default_topic_keywords")]
    pub topic_keywords: Vec<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            download_all: default_download_all(),
            topic_keywords: default_topic_keywords(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON document holding harvested pages
    #[serde(rename = "document-path", default = "default_document_path")]
    pub document_path: String,

    /// Seconds between background saves of the document
    #[serde(rename = "flush-interval-secs", default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
}

impl OutputConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            flush_interval_secs: default_flush_interval_secs(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_depth() -> i32 {
    2
}

fn default_download_all() -> bool {
    true
}

fn default_topic_keywords() -> Vec<String> {
    vec!["prompt-engineering".to_string()]
}

fn default_document_path() -> String {
    "docs.json".to_string()
}

fn default_flush_interval_secs() -> u64 {
    300
}
