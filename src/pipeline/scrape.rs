// src/pipeline/scrape.rs

//! Page scraping pipeline.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, Dataset, Page};
use crate::services::{Dispatcher, PageCrawler, ResourceChecker, ScrapeOutcome};
use crate::storage::DatasetStorage;

/// Read page URLs from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Build the dispatcher described by the `[resources]` configuration.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    Dispatcher::new(ResourceChecker::from_config(&config.resources)?)
}

/// Fetch `urls`, extract datasets, and store them under `scraper`.
pub async fn run_scraper(
    config: &Config,
    storage: &dyn DatasetStorage,
    scraper: &str,
    urls: &[String],
) -> Result<ScrapeOutcome> {
    if urls.is_empty() {
        return Err(AppError::config("no URLs to scrape"));
    }

    let start_time = Utc::now();
    log::info!("Scraper '{}' starting on {} pages", scraper, urls.len());

    let dispatcher = Arc::new(build_dispatcher(config)?);
    let crawler = PageCrawler::new(config.crawler.clone(), dispatcher)?;
    let mut outcome = crawler.crawl(urls).await;
    store_datasets(storage, scraper, &mut outcome).await;

    log::info!(
        "Scraper '{}' finished in {}s: {} datasets written, {} write failures, {} pages skipped, {} fetch failures, {} parse failures",
        scraper,
        (Utc::now() - start_time).num_seconds(),
        outcome.written,
        outcome.write_failures,
        outcome.skipped,
        outcome.fetch_failures,
        outcome.parse_failures
    );

    Ok(outcome)
}

/// Write every extracted dataset, counting failures instead of stopping.
async fn store_datasets(storage: &dyn DatasetStorage, scraper: &str, outcome: &mut ScrapeOutcome) {
    for dataset in &outcome.datasets {
        match storage.write_dataset(scraper, dataset).await {
            Ok(path) => {
                log::debug!("Wrote {}", path.display());
                outcome.written += 1;
            }
            Err(e) => {
                log::warn!("Failed to store dataset for {}: {}", dataset.source_url, e);
                outcome.write_failures += 1;
            }
        }
    }
}

/// Classify a saved HTML file as if it had been fetched from `source_url`.
pub fn run_parse(config: &Config, html_path: &Path, source_url: &str) -> Result<Option<Dataset>> {
    let html = fs::read_to_string(html_path)?;
    let dispatcher = build_dispatcher(config)?;
    dispatcher.classify_and_extract(&Page::new(source_url, html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_urls_skips_blanks_and_comments() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urls.txt");
        fs::write(
            &path,
            "# OCR pages\nhttps://www2.ed.gov/a.html\n\n  https://www2.ed.gov/b.html  \n",
        )
        .unwrap();

        assert_eq!(
            load_urls(&path).unwrap(),
            ["https://www2.ed.gov/a.html", "https://www2.ed.gov/b.html"]
        );
    }

    #[test]
    fn test_run_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        fs::write(
            &path,
            r#"<html><body><div id="container"><div id="maincontent">
                <h1>Data</h1><a href="files/d.csv">CSV</a>
            </div></div></body></html>"#,
        )
        .unwrap();

        let dataset = run_parse(&Config::default(), &path, "https://www2.ed.gov/ocr/")
            .unwrap()
            .unwrap();
        assert_eq!(dataset.title, "Data");
        assert_eq!(dataset.resources[0].url, "https://www2.ed.gov/ocr/files/d.csv");
    }

    struct FlakyStorage {
        fail_on: &'static str,
    }

    #[async_trait::async_trait]
    impl DatasetStorage for FlakyStorage {
        async fn write_dataset(&self, scraper: &str, dataset: &Dataset) -> Result<std::path::PathBuf> {
            if dataset.source_url == self.fail_on {
                return Err(AppError::Io(std::io::Error::other("disk full")));
            }
            Ok(Path::new(scraper).join("x.json"))
        }
    }

    fn dataset(source_url: &str) -> Dataset {
        Dataset {
            source_url: source_url.to_string(),
            title: String::new(),
            publisher: None,
            variant: "maincontent".to_string(),
            resources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_store_continues_after_write_failure() {
        let storage = FlakyStorage {
            fail_on: "https://ed.gov/b",
        };
        let mut outcome = ScrapeOutcome {
            datasets: vec![
                dataset("https://ed.gov/a"),
                dataset("https://ed.gov/b"),
                dataset("https://ed.gov/c"),
            ],
            page_total: 3,
            ..ScrapeOutcome::default()
        };

        store_datasets(&storage, "ocr", &mut outcome).await;

        assert_eq!(outcome.written, 2);
        assert_eq!(outcome.write_failures, 1);
    }

    #[tokio::test]
    async fn test_run_scraper_requires_urls() {
        let tmp = TempDir::new().unwrap();
        let storage = crate::storage::LocalStorage::new(tmp.path());

        let result = run_scraper(&Config::default(), &storage, "ocr", &[]).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
