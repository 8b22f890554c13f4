// src/models/dataset.rs

//! Page, resource, and dataset data structures.

use serde::{Deserialize, Serialize};

/// A fetched page waiting to be classified.
#[derive(Debug, Clone)]
pub struct Page {
    /// URL the page was fetched from
    pub url: String,

    /// Raw HTML content
    pub html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// A downloadable file referenced from a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Absolute URL of the file
    pub url: String,

    /// Page the file was referenced from
    pub source_url: String,

    /// Link text
    #[serde(default)]
    pub name: String,

    /// Lowercase file extension, when one is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Everything extracted from a single page.
///
/// Serialized as-is into one scraper output file per page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    /// Page the dataset was extracted from
    pub source_url: String,

    /// Dataset title
    #[serde(default)]
    pub title: String,

    /// Publishing office, when the page names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Name of the page layout that produced this dataset
    #[serde(default)]
    pub variant: String,

    /// Resources found on the page
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Dataset {
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}
