//! Resource link detection.
//!
//! Decides whether an anchor target points at a downloadable dataset file.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::ResourceConfig;

/// Predicate deciding whether an `href` is a resource link.
pub type ResourcePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Extension-based resource checker with an optional deny list.
#[derive(Debug, Clone)]
pub struct ResourceChecker {
    pattern: Regex,
    deny_list: HashSet<String>,
}

impl ResourceChecker {
    /// Build a checker from bare extensions (`"csv"`, `"xlsx"`, ...).
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = extensions
            .into_iter()
            .map(|ext| regex::escape(ext.as_ref().trim()))
            .filter(|ext| !ext.is_empty())
            .collect();

        if alternatives.is_empty() {
            return Err(AppError::config("no resource extensions configured"));
        }

        // Extension at the end of the path, before any query or fragment.
        let source = format!(r"(?i)\.({})(?:[?#]|$)", alternatives.join("|"));
        let pattern = Regex::new(&source).map_err(|e| AppError::config(e.to_string()))?;

        Ok(Self {
            pattern,
            deny_list: HashSet::new(),
        })
    }

    /// Build a checker from the `[resources]` configuration section.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        Ok(Self::new(&config.extensions)?.with_deny_list(config.deny_list.iter().cloned()))
    }

    /// Resource URLs that extractors must drop.
    pub fn with_deny_list(mut self, urls: impl IntoIterator<Item = String>) -> Self {
        self.deny_list.extend(urls);
        self
    }

    /// True if `href` ends in a known resource extension.
    pub fn is_resource(&self, href: &str) -> bool {
        self.pattern.is_match(href.trim())
    }

    /// True if the absolute resource URL is on the deny list.
    pub fn is_denied(&self, url: &str) -> bool {
        self.deny_list.contains(url)
    }

    /// Lowercase extension of a resource link.
    pub fn format_of(&self, href: &str) -> Option<String> {
        self.pattern
            .captures(href.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }

    /// Wrap this checker as a shareable predicate.
    pub fn predicate(&self) -> ResourcePredicate {
        let checker = self.clone();
        Arc::new(move |href: &str| checker.is_resource(href))
    }
}

impl Default for ResourceChecker {
    fn default() -> Self {
        Self::from_config(&ResourceConfig::default())
            .expect("default resource extensions are valid")
    }
}
