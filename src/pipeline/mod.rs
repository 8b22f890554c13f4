//! Pipeline entry points.
//!
//! - `run_scraper`: Fetch pages, extract datasets, store scraper output
//! - `Statistics::generate`: Aggregate scraper output into statistics

pub mod aggregate;
pub mod corpus;
pub mod report;
pub mod scrape;
pub mod stats;

pub use corpus::{Corpus, CorpusSource};
pub use report::{log_report, render_table};
pub use scrape::{build_dispatcher, load_urls, run_parse, run_scraper};
pub use stats::{Statistics, StatisticsReport};
