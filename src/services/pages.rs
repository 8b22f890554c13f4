// src/services/pages.rs

//! Page crawler service.
//!
//! Fetches pages concurrently and hands each one to the [`Dispatcher`].

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{CrawlerConfig, Dataset, Page};
use crate::services::Dispatcher;
use crate::utils::http;

/// Summary of a scrape run.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub datasets: Vec<Dataset>,
    pub page_total: usize,
    /// Pages without resources or with an unknown layout
    pub skipped: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    /// Datasets persisted by the storage backend
    pub written: usize,
    pub write_failures: usize,
}

/// What happened to a single page.
enum PageResult {
    Extracted(Dataset),
    Skipped,
    FetchFailed,
    ParseFailed,
}

/// Service for fetching and classifying pages.
pub struct PageCrawler {
    config: CrawlerConfig,
    client: Client,
    dispatcher: Arc<Dispatcher>,
}

impl PageCrawler {
    /// Create a new page crawler with its own HTTP client.
    pub fn new(config: CrawlerConfig, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        let client = http::create_async_client(&config)?;
        Ok(Self::with_client(config, client, dispatcher))
    }

    /// Create a page crawler sharing an existing client.
    pub fn with_client(config: CrawlerConfig, client: Client, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            client,
            dispatcher,
        }
    }

    /// Fetch and classify all `urls`, bounded by the configured concurrency.
    pub async fn crawl(&self, urls: &[String]) -> ScrapeOutcome {
        let delay = Duration::from_millis(self.config.request_delay_ms);
        let concurrency = self.config.max_concurrent.max(1);

        let mut outcome = ScrapeOutcome {
            page_total: urls.len(),
            ..ScrapeOutcome::default()
        };

        let mut page_stream = stream::iter(urls)
            .map(|url| async move { self.process_url(url).await })
            .buffer_unordered(concurrency);

        while let Some(result) = page_stream.next().await {
            match result {
                PageResult::Extracted(dataset) => outcome.datasets.push(dataset),
                PageResult::Skipped => outcome.skipped += 1,
                PageResult::FetchFailed => outcome.fetch_failures += 1,
                PageResult::ParseFailed => outcome.parse_failures += 1,
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        outcome
    }

    async fn process_url(&self, url: &str) -> PageResult {
        let page = match http::fetch_page(&self.client, url).await {
            Ok(page) => page,
            Err(error) => {
                log::warn!("Failed to fetch {}: {}", url, error);
                return PageResult::FetchFailed;
            }
        };
        self.process_page(&page)
    }

    /// Classify an already fetched page.
    fn process_page(&self, page: &Page) -> PageResult {
        match self.dispatcher.classify_and_extract(page) {
            Ok(Some(dataset)) => {
                log::debug!(
                    "Extracted {} resources from {}",
                    dataset.resource_count(),
                    page.url
                );
                PageResult::Extracted(dataset)
            }
            Ok(None) => PageResult::Skipped,
            Err(error) => {
                log::warn!("Failed to parse {}: {}", page.url, error);
                PageResult::ParseFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ResourceChecker;

    fn crawler() -> PageCrawler {
        let dispatcher = Arc::new(Dispatcher::new(ResourceChecker::default()).unwrap());
        PageCrawler::new(CrawlerConfig::default(), dispatcher).unwrap()
    }

    #[tokio::test]
    async fn test_process_page_outcomes() {
        let crawler = crawler();

        let extracted = Page::new(
            "https://www2.ed.gov/a.html",
            r#"<body><div class="accordiontitle">A</div><a href="a.csv">a</a></body>"#,
        );
        let skipped = Page::new("https://www2.ed.gov/b.html", "<body><p>nothing</p></body>");
        let broken = Page::new("https://www2.ed.gov/c.html", "");

        assert!(matches!(
            crawler.process_page(&extracted),
            PageResult::Extracted(_)
        ));
        assert!(matches!(crawler.process_page(&skipped), PageResult::Skipped));
        assert!(matches!(
            crawler.process_page(&broken),
            PageResult::ParseFailed
        ));
    }

    #[tokio::test]
    async fn test_crawl_counts_fetch_failures() {
        let config = CrawlerConfig {
            request_delay_ms: 0,
            timeout_secs: 1,
            ..CrawlerConfig::default()
        };
        let dispatcher = Arc::new(Dispatcher::new(ResourceChecker::default()).unwrap());
        let crawler = PageCrawler::new(config, dispatcher).unwrap();

        let outcome = crawler.crawl(&["not a url".to_string()]).await;

        assert_eq!(outcome.page_total, 1);
        assert_eq!(outcome.fetch_failures, 1);
        assert!(outcome.datasets.is_empty());
    }
}
