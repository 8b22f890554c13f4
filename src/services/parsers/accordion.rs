//! Accordion layout: resources grouped under collapsible `.accordiontitle` sections.

use scraper::{Html, Selector};

use super::{Extractor, PageSelectors, ResourceCollector};
use crate::error::Result;
use crate::models::{Dataset, Page};
use crate::services::ResourceChecker;
use crate::utils::{element_text, parse_selector};

const SECTION_CLASS: &str = "accordiontitle";

pub struct AccordionExtractor {
    checker: ResourceChecker,
    selectors: PageSelectors,
    /// Section titles and anchors, matched in document order
    walk: Selector,
}

impl AccordionExtractor {
    pub fn new(checker: ResourceChecker) -> Result<Self> {
        Ok(Self {
            checker,
            selectors: PageSelectors::new()?,
            walk: parse_selector(&format!(".{SECTION_CLASS}, a[href]"))?,
        })
    }
}

impl Extractor for AccordionExtractor {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn extract(&self, page: &Page, document: &Html) -> Result<Option<Dataset>> {
        let mut collector = ResourceCollector::new(&self.checker, &page.url);
        let mut first_section: Option<String> = None;
        let mut section: Option<String> = None;

        for element in document.select(&self.walk) {
            if element.value().classes().any(|class| class == SECTION_CLASS) {
                let text = element_text(&element);
                section = (!text.is_empty()).then_some(text);
                if first_section.is_none() {
                    first_section.clone_from(&section);
                }
                continue;
            }
            collector.push(&element, section.as_deref());
        }

        let resources = collector.finish();
        if resources.is_empty() {
            return Ok(None);
        }

        let title = self
            .selectors
            .heading_in(&document.root_element())
            .or_else(|| self.selectors.page_title(document))
            .or(first_section)
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
