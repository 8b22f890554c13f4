// src/pipeline/aggregate.rs

//! Grouped counts over the corpus.
//!
//! Every statistic is "deduplicate, normalize key, group, count". Groups come
//! out in ascending key order; sorting by count is left to the caller.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::models::{CorpusRow, StatKind, StatRow, StatTable};
use crate::utils::fs::parent_name;

/// Rows unique by `(url, source_url)`, first occurrence kept.
fn unique_resources(corpus: &[CorpusRow]) -> impl Iterator<Item = &CorpusRow> {
    let mut seen = HashSet::new();
    corpus
        .iter()
        .filter(move |&row| seen.insert((row.url.as_str(), row.source_url.as_str())))
}

fn into_table<K>(
    kind: StatKind,
    counts: BTreeMap<K, usize>,
    keys: impl Fn(K) -> Vec<String>,
) -> StatTable {
    let rows = counts
        .into_iter()
        .map(|(key, count)| StatRow::new(keys(key), count))
        .collect();
    StatTable::new(kind, rows)
}

/// Distinct pages per domain.
pub fn page_count_per_domain(corpus: &[CorpusRow]) -> StatTable {
    let mut seen = HashSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for row in corpus {
        if seen.insert(row.source_url.as_str()) {
            *counts.entry(row.domain.clone()).or_default() += 1;
        }
    }

    into_table(StatKind::PageCountPerDomain, counts, |domain| vec![domain])
}

/// Distinct `(resource, page)` pairs per domain.
pub fn resource_count_per_domain(corpus: &[CorpusRow]) -> StatTable {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for row in unique_resources(corpus) {
        *counts.entry(row.domain.clone()).or_default() += 1;
    }

    into_table(StatKind::ResourceCountPerDomain, counts, |domain| vec![domain])
}

/// Distinct resources per `(domain, page)`.
pub fn resource_count_per_page(corpus: &[CorpusRow]) -> StatTable {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();

    for row in unique_resources(corpus) {
        *counts
            .entry((row.domain.clone(), row.source_url.clone()))
            .or_default() += 1;
    }

    into_table(StatKind::ResourceCountPerPage, counts, |(domain, page)| {
        vec![domain, page]
    })
}

/// Output files per scraper, the scraper being the file's parent directory.
pub fn dataset_count_per_scraper<'a>(files: impl IntoIterator<Item = &'a Path>) -> StatTable {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for path in files {
        match parent_name(path) {
            Some(scraper) => *counts.entry(scraper).or_default() += 1,
            None => log::warn!("Cannot determine scraper for {}", path.display()),
        }
    }

    into_table(StatKind::DatasetCountPerScraper, counts, |scraper| vec![scraper])
}
