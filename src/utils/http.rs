// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::{CrawlerConfig, Page};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page asynchronously.
///
/// Non-success status codes are reported as HTTP errors.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<Page> {
    let response = client.get(url).send().await?.error_for_status()?;
    let final_url = response.url().to_string();
    let html = response.text().await?;
    Ok(Page::new(final_url, html))
}
