//! Container layout: resources listed inside `#container #maincontent`.

use scraper::{Html, Selector};

use super::{Extractor, PageSelectors, ResourceCollector};
use crate::error::Result;
use crate::models::{Dataset, Page};
use crate::services::ResourceChecker;
use crate::utils::parse_selector;

pub struct MainContentExtractor {
    checker: ResourceChecker,
    selectors: PageSelectors,
    content: Selector,
}

impl MainContentExtractor {
    pub fn new(checker: ResourceChecker) -> Result<Self> {
        Ok(Self {
            checker,
            selectors: PageSelectors::new()?,
            content: parse_selector("#container #maincontent")?,
        })
    }
}

impl Extractor for MainContentExtractor {
    fn name(&self) -> &'static str {
        "maincontent"
    }

    fn extract(&self, page: &Page, document: &Html) -> Result<Option<Dataset>> {
        let Some(content) = document.select(&self.content).next() else {
            return Ok(None);
        };

        // Navigation and footer links outside the content block are ignored.
        let mut collector = ResourceCollector::new(&self.checker, &page.url);
        for anchor in content.select(&self.selectors.anchor) {
            collector.push(&anchor, None);
        }

        let resources = collector.finish();
        if resources.is_empty() {
            return Ok(None);
        }

        let title = self
            .selectors
            .heading_in(&content)
            .or_else(|| self.selectors.page_title(document))
            .unwrap_or_default();

        Ok(Some(Dataset {
            source_url: page.url.clone(),
            title,
            publisher: self.selectors.publisher(document),
            variant: self.name().to_string(),
            resources,
        }))
    }
}
