// src/pipeline/corpus.rs

//! Corpus construction from scraper output files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CorpusRow, PathsConfig, ResourceConfig};
use crate::utils::absolutize;
use crate::utils::fs::{parent_name, read_path_list, traverse_output};

/// Output files to aggregate and where the list came from.
#[derive(Debug, Clone, Default)]
pub struct CorpusSource {
    pub files: Vec<PathBuf>,
    /// True when the deduplicated list was unavailable and the whole output
    /// tree was traversed instead
    pub degraded: bool,
}

impl CorpusSource {
    /// Use the deduplicated file list when readable, else traverse the output tree.
    ///
    /// Relative entries in the list are taken relative to the output root.
    pub fn resolve(paths: &PathsConfig) -> Result<Self> {
        let list_path = paths.dedup_list_path();
        match read_path_list(&list_path) {
            Ok(entries) => {
                let root = Path::new(&paths.output_dir);
                let files: Vec<PathBuf> = entries
                    .into_iter()
                    .map(|entry| {
                        if entry.is_absolute() {
                            entry
                        } else {
                            root.join(entry)
                        }
                    })
                    .collect();
                log::debug!(
                    "Using {} deduplicated files from {}",
                    files.len(),
                    list_path.display()
                );
                Ok(Self {
                    files,
                    degraded: false,
                })
            }
            Err(e) => {
                log::warn!(
                    "Cannot read deduplication results at {} ({}). Run the deduplicate transformer first; falling back to all scraper output.",
                    list_path.display(),
                    e
                );
                Ok(Self {
                    files: traverse_output(&paths.scrapers_dir())?,
                    degraded: true,
                })
            }
        }
    }

    /// Files that hold per-page output, excluding the reserved aggregate file.
    pub fn page_files<'a>(&'a self, reserved_file: &'a str) -> impl Iterator<Item = &'a Path> {
        self.files
            .iter()
            .map(PathBuf::as_path)
            .filter(move |path| !is_reserved(path, reserved_file))
    }
}

fn is_reserved(path: &Path, reserved_file: &str) -> bool {
    path.file_name().is_some_and(|name| name == reserved_file)
}

/// The subset of a scraper output file the corpus needs.
#[derive(Debug, Deserialize)]
struct OutputFile {
    resources: Vec<OutputResource>,
}

#[derive(Debug, Deserialize)]
struct OutputResource {
    url: String,
    source_url: String,
}

/// Union of all resource references across the scraper output files.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub rows: Vec<CorpusRow>,
    pub files_read: usize,
    pub files_skipped: usize,
    /// Rows whose `source_url` has no host
    pub rows_dropped: usize,
}

impl Corpus {
    /// Read every page file of `source` into corpus rows.
    ///
    /// Unreadable or invalid files are skipped with a warning. Resources found
    /// on print-view pages are left out, as are rows whose page URL has no
    /// host. Fails when no file could be used.
    pub fn build(source: &CorpusSource, resources: &ResourceConfig) -> Result<Self> {
        let mut corpus = Corpus::default();
        let mut discovered = 0;
        let marker = resources.print_view_marker.as_str();
        let is_print_view = |source_url: &str| !marker.is_empty() && source_url.contains(marker);

        for path in source.page_files(&resources.reserved_file) {
            discovered += 1;
            match read_output_file(path) {
                Ok(file) => {
                    let scraper = parent_name(path).unwrap_or_default();
                    for r in file.resources {
                        if is_print_view(&r.source_url) {
                            continue;
                        }
                        let url = absolutize(&r.url, &r.source_url);
                        match CorpusRow::new(url, r.source_url.as_str(), scraper.as_str()) {
                            Some(row) => corpus.rows.push(row),
                            None => {
                                log::warn!(
                                    "Dropping row with unparseable source_url '{}' in {}",
                                    r.source_url,
                                    path.display()
                                );
                                corpus.rows_dropped += 1;
                            }
                        }
                    }
                    corpus.files_read += 1;
                }
                Err(e @ AppError::Io(_)) => {
                    log::warn!("Could not read file {}: {}", path.display(), e);
                    corpus.files_skipped += 1;
                }
                Err(e) => {
                    log::warn!("Could not parse file {} as JSON: {}", path.display(), e);
                    corpus.files_skipped += 1;
                }
            }
        }

        if discovered == 0 {
            return Err(AppError::empty_corpus("no scraper output files found"));
        }
        if corpus.files_read == 0 {
            return Err(AppError::empty_corpus(format!(
                "none of the {discovered} scraper output files could be read"
            )));
        }

        log::info!(
            "Corpus built: {} resource rows from {} files ({} files skipped, {} rows dropped)",
            corpus.rows.len(),
            corpus.files_read,
            corpus.files_skipped,
            corpus.rows_dropped
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn read_output_file(path: &Path) -> Result<OutputFile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn paths(root: &Path) -> PathsConfig {
        PathsConfig {
            output_dir: root.to_string_lossy().into_owned(),
            ..PathsConfig::default()
        }
    }

    const VALID: &str = r#"{"resources": [
        {"url": "/files/a.csv", "source_url": "https://www2.ed.gov/ocr/data.html"},
        {"url": "https://nces.ed.gov/b.xlsx", "source_url": "https://www2.ed.gov/ocr/data.html"},
        {"url": "c.pdf", "source_url": "https://www2.ed.gov/print/ocr/data.html"}
    ]}"#;

    #[test]
    fn test_build_reads_valid_and_skips_corrupt() {
        let tmp = TempDir::new().unwrap();
        let source = CorpusSource {
            files: vec![
                write(tmp.path(), "scrapers/ocr/1.json", VALID),
                write(tmp.path(), "scrapers/ocr/2.json", "{not json"),
            ],
            degraded: false,
        };

        let corpus = Corpus::build(&source, &ResourceConfig::default()).unwrap();

        assert_eq!(corpus.files_read, 1);
        assert_eq!(corpus.files_skipped, 1);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.rows[0].url, "https://www2.ed.gov/files/a.csv");
        assert_eq!(corpus.rows[0].scraper, "ocr");
        assert_eq!(corpus.rows[1].url, "https://nces.ed.gov/b.xlsx");
    }

    #[test]
    fn test_reserved_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let source = CorpusSource {
            files: vec![
                write(tmp.path(), "scrapers/ocr/data.json", VALID),
                write(tmp.path(), "scrapers/ocr/1.json", r#"{"resources": []}"#),
            ],
            degraded: false,
        };

        let corpus = Corpus::build(&source, &ResourceConfig::default()).unwrap();
        assert_eq!(corpus.files_read, 1);
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_no_files_is_fatal() {
        let result = Corpus::build(&CorpusSource::default(), &ResourceConfig::default());
        assert!(matches!(result, Err(AppError::EmptyCorpus(_))));
    }

    #[test]
    fn test_only_corrupt_files_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let source = CorpusSource {
            files: vec![
                write(tmp.path(), "scrapers/ocr/1.json", "[]"),
                tmp.path().join("scrapers/ocr/missing.json"),
            ],
            degraded: false,
        };

        let result = Corpus::build(&source, &ResourceConfig::default());
        assert!(matches!(result, Err(AppError::EmptyCorpus(_))));
    }

    #[test]
    fn test_resolve_prefers_dedup_list() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "scrapers/ocr/1.json", VALID);
        write(tmp.path(), "scrapers/ocr/2.json", VALID);
        write(
            tmp.path(),
            "transformers/deduplicate/deduplicated_all.lst",
            "scrapers/ocr/1.json\n",
        );

        let source = CorpusSource::resolve(&paths(tmp.path())).unwrap();
        assert!(!source.degraded);
        assert_eq!(source.files, vec![tmp.path().join("scrapers/ocr/1.json")]);

        let corpus = Corpus::build(&source, &ResourceConfig::default()).unwrap();
        assert_eq!(corpus.files_read, 1);
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_resolve_keeps_absolute_list_entries() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let file = write(elsewhere.path(), "nces/7.json", VALID);
        write(
            tmp.path(),
            "transformers/deduplicate/deduplicated_all.lst",
            &format!("{}\n", file.display()),
        );

        let source = CorpusSource::resolve(&paths(tmp.path())).unwrap();
        assert_eq!(source.files, vec![file]);
    }

    #[test]
    fn test_hostless_rows_dropped_once() {
        let tmp = TempDir::new().unwrap();
        let source = CorpusSource {
            files: vec![write(
                tmp.path(),
                "scrapers/ocr/1.json",
                r#"{"resources": [
                    {"url": "a.csv", "source_url": "relative/page.html"},
                    {"url": "b.csv", "source_url": "https://ed.gov/page"}
                ]}"#,
            )],
            degraded: false,
        };

        let corpus = Corpus::build(&source, &ResourceConfig::default()).unwrap();
        assert_eq!(corpus.rows_dropped, 1);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.rows[0].domain, "ed.gov");
    }

    #[test]
    fn test_resolve_falls_back_to_traversal() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "scrapers/ocr/1.json", VALID);
        write(tmp.path(), "scrapers/nces/2.json", VALID);

        let source = CorpusSource::resolve(&paths(tmp.path())).unwrap();
        assert!(source.degraded);
        assert_eq!(source.files.len(), 2);
    }
}
