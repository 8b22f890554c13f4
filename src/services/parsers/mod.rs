//! Page-layout extractors.
//!
//! Each extractor knows one HTML template used by the data portals and turns
//! a page built from it into a [`Dataset`].

mod accordion;
mod maincontent;

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{Dataset, Page, Resource};
use crate::services::ResourceChecker;
use crate::utils::{absolutize, element_text, parse_selector};

pub use accordion::AccordionExtractor;
pub use maincontent::MainContentExtractor;

/// Extracts a dataset from one known page layout.
pub trait Extractor: Send + Sync {
    /// Layout name recorded on the produced dataset.
    fn name(&self) -> &'static str;

    /// Extract the page's dataset, or `None` if the page yields no resources.
    fn extract(&self, page: &Page, document: &Html) -> Result<Option<Dataset>>;
}

/// Selectors shared by every extractor.
#[derive(Debug, Clone)]
struct PageSelectors {
    heading: Selector,
    title: Selector,
    publisher: Selector,
    anchor: Selector,
}

impl PageSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            heading: parse_selector("h1")?,
            title: parse_selector("title")?,
            publisher: parse_selector(
                r#"meta[name="publisher"], meta[name="DC.publisher"], meta[name="dc.publisher"]"#,
            )?,
            anchor: parse_selector("a[href]")?,
        })
    }

    /// First non-empty `<h1>` below `scope`.
    fn heading_in(&self, scope: &ElementRef) -> Option<String> {
        scope
            .select(&self.heading)
            .map(|h| element_text(&h))
            .find(|text| !text.is_empty())
    }

    /// Page `<title>` text.
    fn page_title(&self, document: &Html) -> Option<String> {
        document
            .select(&self.title)
            .map(|t| element_text(&t))
            .find(|text| !text.is_empty())
    }

    /// Publisher named by a `<meta>` tag.
    fn publisher(&self, document: &Html) -> Option<String> {
        document
            .select(&self.publisher)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(str::to_string)
    }
}

/// Accumulates resources for one page, dropping repeats and denied URLs.
struct ResourceCollector<'a> {
    checker: &'a ResourceChecker,
    source_url: &'a str,
    seen: HashSet<String>,
    resources: Vec<Resource>,
}

impl<'a> ResourceCollector<'a> {
    fn new(checker: &'a ResourceChecker, source_url: &'a str) -> Self {
        Self {
            checker,
            source_url,
            seen: HashSet::new(),
            resources: Vec::new(),
        }
    }

    /// Record `anchor` if it links to a resource.
    ///
    /// `fallback_name` names the resource when the anchor has no text.
    fn push(&mut self, anchor: &ElementRef, fallback_name: Option<&str>) {
        let Some(href) = anchor.value().attr("href") else {
            return;
        };
        if !self.checker.is_resource(href) {
            return;
        }

        let url = absolutize(href, self.source_url);
        if self.checker.is_denied(&url) || !self.seen.insert(url.clone()) {
            return;
        }

        let text = element_text(anchor);
        let name = if !text.is_empty() {
            text
        } else if let Some(fallback) = fallback_name {
            fallback.to_string()
        } else {
            url.rsplit('/').next().unwrap_or_default().to_string()
        };

        self.resources.push(Resource {
            format: self.checker.format_of(&url),
            url,
            source_url: self.source_url.to_string(),
            name,
        });
    }

    fn finish(self) -> Vec<Resource> {
        self.resources
    }
}
