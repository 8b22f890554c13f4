// src/services/dispatcher.rs

//! Page classification and extractor dispatch.
//!
//! A page is first checked for any resource link at all. Pages that have one
//! are matched against an ordered list of layout fingerprints; the first
//! fingerprint present in the page selects the extractor. Pages matching no
//! fingerprint are not extracted.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Dataset, Page};
use crate::services::parsers::{AccordionExtractor, Extractor, MainContentExtractor};
use crate::services::{ResourceChecker, ResourcePredicate};
use crate::utils::parse_selector;

/// Structural marker identifying a page layout.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    selector: Selector,
    source: String,
}

impl Fingerprint {
    /// Fingerprint matching when `selector` finds an element in the page body.
    pub fn new(selector: &str) -> Result<Self> {
        Ok(Self {
            selector: parse_selector(selector)?,
            source: selector.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn matches(&self, body: &scraper::ElementRef) -> bool {
        body.select(&self.selector).next().is_some()
    }
}

/// A fingerprint paired with the extractor for its layout.
pub struct Variant {
    pub fingerprint: Fingerprint,
    pub extractor: Box<dyn Extractor>,
}

impl Variant {
    pub fn new(fingerprint: Fingerprint, extractor: impl Extractor + 'static) -> Self {
        Self {
            fingerprint,
            extractor: Box::new(extractor),
        }
    }
}

/// Routes pages to the extractor of their layout.
pub struct Dispatcher {
    is_resource: ResourcePredicate,
    variants: Vec<Variant>,
    body: Selector,
    anchor: Selector,
}

impl Dispatcher {
    /// Dispatcher over the known layouts, in priority order:
    /// accordion pages first, then container/main-content pages.
    pub fn new(checker: ResourceChecker) -> Result<Self> {
        let variants = vec![
            Variant::new(
                Fingerprint::new(".accordiontitle")?,
                AccordionExtractor::new(checker.clone())?,
            ),
            Variant::new(
                Fingerprint::new("#container #maincontent")?,
                MainContentExtractor::new(checker.clone())?,
            ),
        ];
        Self::with_variants(checker.predicate(), variants)
    }

    /// Dispatcher with a custom predicate and variant list.
    pub fn with_variants(is_resource: ResourcePredicate, variants: Vec<Variant>) -> Result<Self> {
        Ok(Self {
            is_resource,
            variants,
            body: parse_selector("body")?,
            anchor: parse_selector("a[href]")?,
        })
    }

    /// Fingerprints in evaluation order.
    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.variants.iter().map(|v| &v.fingerprint)
    }

    /// Classify `page` and run the matching extractor.
    ///
    /// Returns `Ok(None)` when the page has no resource link or its layout is
    /// unknown. A document without a `<body>` is an error.
    pub fn classify_and_extract(&self, page: &Page) -> Result<Option<Dataset>> {
        let document = Html::parse_document(&page.html);
        let body = document
            .select(&self.body)
            .next()
            .ok_or_else(|| AppError::parse(&page.url, "document has no <body> element"))?;

        let has_resource = body
            .select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .any(|href| (self.is_resource)(href));
        if !has_resource {
            log::debug!("No resource links on {}", page.url);
            return Ok(None);
        }

        match self.variants.iter().find(|v| v.fingerprint.matches(&body)) {
            Some(variant) => {
                log::debug!(
                    "Page {} matched '{}', using {} extractor",
                    page.url,
                    variant.fingerprint.as_str(),
                    variant.extractor.name()
                );
                variant.extractor.extract(page, &document)
            }
            None => {
                log::debug!("Unknown layout for {}, skipping", page.url);
                Ok(None)
            }
        }
    }
}
