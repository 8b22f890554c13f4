// src/pipeline/stats.rs

//! Statistics engine.
//!
//! Each operation computes one statistic, optionally sorts it by descending
//! count, and appends it to the workbook as a new sheet.

use crate::error::Result;
use crate::models::{Config, CorpusRow, StatTable};
use crate::pipeline::aggregate;
use crate::pipeline::corpus::{Corpus, CorpusSource};
use crate::storage::WorkbookWriter;

/// All four statistics from one run.
#[derive(Debug, Clone)]
pub struct StatisticsReport {
    pub datasets_per_scraper: StatTable,
    pub page_count_per_domain: StatTable,
    pub resource_count_per_domain: StatTable,
    pub resource_count_per_page: StatTable,
}

impl StatisticsReport {
    /// Tables in presentation order.
    pub fn tables(&self) -> [&StatTable; 4] {
        [
            &self.datasets_per_scraper,
            &self.page_count_per_domain,
            &self.resource_count_per_domain,
            &self.resource_count_per_page,
        ]
    }
}

/// Computes statistics and records them in a workbook.
pub struct Statistics {
    workbook: WorkbookWriter,
}

impl Statistics {
    pub fn new(workbook: WorkbookWriter) -> Self {
        Self { workbook }
    }

    /// Statistics engine writing to the configured workbook.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            WorkbookWriter::new(config.paths.workbook_path())
                .with_csv_export(config.stats.csv_export),
        )
    }

    pub fn workbook(&self) -> &WorkbookWriter {
        &self.workbook
    }

    fn finish(&self, mut table: StatTable, ordered: bool) -> Result<StatTable> {
        if table.is_empty() {
            log::warn!("No rows for {}", table.kind.sheet_name());
        }
        if ordered {
            table.sort_descending();
        }
        self.workbook.append(&table)?;
        Ok(table)
    }

    pub fn page_count_per_domain(&self, corpus: &[CorpusRow], ordered: bool) -> Result<StatTable> {
        self.finish(aggregate::page_count_per_domain(corpus), ordered)
    }

    pub fn resource_count_per_domain(
        &self,
        corpus: &[CorpusRow],
        ordered: bool,
    ) -> Result<StatTable> {
        self.finish(aggregate::resource_count_per_domain(corpus), ordered)
    }

    pub fn resource_count_per_page(
        &self,
        corpus: &[CorpusRow],
        ordered: bool,
    ) -> Result<StatTable> {
        self.finish(aggregate::resource_count_per_page(corpus), ordered)
    }

    /// Count output files per scraper.
    ///
    /// A `source` built by traversal (no deduplicated list) counts every
    /// output file and marks the table as degraded.
    pub fn datasets_per_scraper(
        &self,
        source: &CorpusSource,
        reserved_file: &str,
        ordered: bool,
    ) -> Result<StatTable> {
        let mut table = aggregate::dataset_count_per_scraper(source.page_files(reserved_file));
        if source.degraded {
            log::warn!(
                "Dataset counts include files from every scraper run without cross-scraper deduplication"
            );
            table.degraded = true;
        }
        self.finish(table, ordered)
    }

    /// Build the corpus and produce all four statistics.
    pub fn generate(&self, config: &Config, ordered: bool) -> Result<StatisticsReport> {
        log::debug!("Creating statistics...");

        let source = CorpusSource::resolve(&config.paths)?;
        let corpus = Corpus::build(&source, &config.resources)?;

        let resource_count_per_page = self.resource_count_per_page(&corpus.rows, ordered)?;
        let resource_count_per_domain = self.resource_count_per_domain(&corpus.rows, ordered)?;
        let page_count_per_domain = self.page_count_per_domain(&corpus.rows, ordered)?;
        let datasets_per_scraper =
            self.datasets_per_scraper(&source, &config.resources.reserved_file, ordered)?;

        Ok(StatisticsReport {
            datasets_per_scraper,
            page_count_per_domain,
            resource_count_per_domain,
            resource_count_per_page,
        })
    }
}
