// src/models/stats.rs

//! Corpus rows and derived statistic tables.

use serde::{Deserialize, Serialize};

use crate::utils::domain_key;

/// One resource reference from the scraper output, tagged with its scraper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
    pub url: String,
    pub source_url: String,
    pub scraper: String,
    /// Normalized host of `source_url`
    pub domain: String,
}

impl CorpusRow {
    /// Returns `None` when `source_url` has no host to group by.
    pub fn new(
        url: impl Into<String>,
        source_url: impl Into<String>,
        scraper: impl Into<String>,
    ) -> Option<Self> {
        let source_url = source_url.into();
        let domain = domain_key(&source_url)?;
        Some(Self {
            url: url.into(),
            source_url,
            scraper: scraper.into(),
            domain,
        })
    }
}

/// The four statistics produced from scraper output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    PageCountPerDomain,
    ResourceCountPerDomain,
    ResourceCountPerPage,
    DatasetCountPerScraper,
}

impl StatKind {
    /// Workbook sheet name.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            StatKind::PageCountPerDomain => "PAGE COUNT PER DOMAIN",
            StatKind::ResourceCountPerDomain => "RESOURCE COUNT PER DOMAIN",
            StatKind::ResourceCountPerPage => "RESOURCE COUNT PER PAGE",
            StatKind::DatasetCountPerScraper => "DATASET COUNT PER SCRAPER",
        }
    }

    /// Column headers: group keys first, count last.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            StatKind::PageCountPerDomain => &["domain", "page count"],
            StatKind::ResourceCountPerDomain => &["domain", "resource count"],
            StatKind::ResourceCountPerPage => &["domain", "page", "resource per page"],
            StatKind::DatasetCountPerScraper => &["scraper", "dataset count"],
        }
    }
}

/// A grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRow {
    pub keys: Vec<String>,
    pub count: usize,
}

impl StatRow {
    pub fn new(keys: Vec<String>, count: usize) -> Self {
        Self { keys, count }
    }
}

/// A derived statistic: `{group keys, count}` rows.
///
/// The table never carries a total row; see [`StatTable::rows_with_total`].
#[derive(Debug, Clone)]
pub struct StatTable {
    pub kind: StatKind,
    pub rows: Vec<StatRow>,
    /// Built from a fallback source with reduced accuracy
    pub degraded: bool,
}

impl StatTable {
    pub fn new(kind: StatKind, rows: Vec<StatRow>) -> Self {
        Self {
            kind,
            rows,
            degraded: false,
        }
    }

    /// Sort by descending count. Equal counts keep their current order.
    pub fn sort_descending(&mut self) {
        self.rows.sort_by(|a, b| b.count.cmp(&a.count));
    }

    /// Sum of the count column.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// Count for the row whose keys equal `keys`.
    pub fn count_for(&self, keys: &[&str]) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map(|row| row.count)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows rendered as strings with a trailing `Total` row.
    ///
    /// The label goes in the first key column; remaining key columns are blank.
    pub fn rows_with_total(&self) -> Vec<Vec<String>> {
        let key_width = self.kind.columns().len() - 1;
        let mut rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.keys.clone();
                cells.push(row.count.to_string());
                cells
            })
            .collect();

        let mut total = vec![String::new(); key_width];
        if let Some(first) = total.first_mut() {
            *first = "Total".to_string();
        }
        total.push(self.total().to_string());
        rows.push(total);
        rows
    }
}
