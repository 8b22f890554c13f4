//! Storage for scraper output and statistics.
//!
//! ## Directory Structure
//!
//! ```text
//! output/
//! ├── scrapers/                 # One directory per scraper
//! │   └── ocr/
//! │       ├── 3f9a0c1e2b7d4a55.json   # One dataset per scraped page
//! │       └── data.json               # Reserved aggregate, never read as a page
//! ├── transformers/deduplicate/
//! │   └── deduplicated_all.lst  # Optional canonical file list
//! └── tools/stats/
//!     └── metrics.json          # Statistics workbook (append-only sheets)
//! ```

pub mod local;
pub mod workbook;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Dataset;

// Re-export for convenience
pub use local::LocalStorage;
pub use workbook::{Sheet, Workbook, WorkbookWriter};

/// Trait for scraper output backends.
#[async_trait]
pub trait DatasetStorage: Send + Sync {
    /// Persist one page's dataset for `scraper`, returning where it was written.
    async fn write_dataset(&self, scraper: &str, dataset: &Dataset) -> Result<PathBuf>;
}
