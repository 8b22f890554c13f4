//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Resource detection rules
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Aggregation settings
    #[serde(default)]
    pub stats: StatsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.resources.extensions.is_empty() {
            return Err(AppError::validation("No resource extensions defined"));
        }
        if let Some(ext) = self
            .resources
            .extensions
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.contains('.'))
        {
            return Err(AppError::validation(format!(
                "resources.extensions entry '{ext}' must be a bare extension"
            )));
        }
        if self.resources.reserved_file.trim().is_empty() {
            return Err(AppError::validation("resources.reserved_file is empty"));
        }
        if self.paths.output_dir.trim().is_empty() {
            return Err(AppError::validation("paths.output_dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Rules deciding what counts as a downloadable resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// File extensions (without the dot) treated as dataset resources
    #[serde(default = "defaults::extensions")]
    pub extensions: Vec<String>,

    /// Resource URLs never emitted by the extractors
    #[serde(default)]
    pub deny_list: Vec<String>,

    /// Pages whose URL contains this marker are excluded from statistics
    #[serde(default = "defaults::print_view_marker")]
    pub print_view_marker: String,

    /// Aggregate artifact name skipped when reading scraper output
    #[serde(default = "defaults::reserved_file")]
    pub reserved_file: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            extensions: defaults::extensions(),
            deny_list: Vec::new(),
            print_view_marker: defaults::print_view_marker(),
            reserved_file: defaults::reserved_file(),
        }
    }
}

/// Output directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of all crawler output
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Deduplicated file list, relative to `output_dir`
    #[serde(default = "defaults::dedup_list")]
    pub dedup_list: String,

    /// Statistics workbook, relative to `output_dir`
    #[serde(default = "defaults::workbook")]
    pub workbook: String,
}

impl PathsConfig {
    /// Directory holding one sub-directory per scraper.
    pub fn scrapers_dir(&self) -> PathBuf {
        Path::new(&self.output_dir).join("scrapers")
    }

    pub fn dedup_list_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.dedup_list)
    }

    pub fn workbook_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.workbook)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            dedup_list: defaults::dedup_list(),
            workbook: defaults::workbook(),
        }
    }
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Sort statistics by descending count
    #[serde(default = "defaults::ordered")]
    pub ordered: bool,

    /// Also write every sheet as a CSV file next to the workbook
    #[serde(default)]
    pub csv_export: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            ordered: defaults::ordered(),
            csv_export: false,
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; edcrawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Resource defaults
    pub fn extensions() -> Vec<String> {
        [
            "csv", "xls", "xlsx", "xlsm", "pdf", "zip", "doc", "docx", "txt", "json", "xml",
            "dat", "sas", "sav", "dta", "ppt", "pptx", "rtf",
        ]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
    }
    pub fn print_view_marker() -> String {
        "/print/".into()
    }
    pub fn reserved_file() -> String {
        "data.json".into()
    }

    // Path defaults
    pub fn output_dir() -> String {
        "output".into()
    }
    pub fn dedup_list() -> String {
        "transformers/deduplicate/deduplicated_all.lst".into()
    }
    pub fn workbook() -> String {
        "tools/stats/metrics.json".into()
    }

    pub fn ordered() -> bool {
        true
    }
}
