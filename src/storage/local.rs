//! Local filesystem storage implementation.
//!
//! Each dataset is written to `{root}/scrapers/{scraper}/{id}.json`, where
//! `id` is derived from the page URL so re-scraping a page replaces its file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Dataset;
use crate::storage::DatasetStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Stable file id for a page URL.
    fn dataset_id(source_url: &str) -> String {
        let digest = Sha256::digest(source_url.as_bytes());
        hex::encode(&digest[..8])
    }

    fn scraper_key(scraper: &str) -> Result<String> {
        if scraper.is_empty()
            || scraper.starts_with('.')
            || scraper.contains(['/', '\\'])
        {
            return Err(AppError::validation(format!(
                "invalid scraper name '{scraper}'"
            )));
        }
        Ok(format!("scrapers/{scraper}"))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }
}

#[async_trait]
impl DatasetStorage for LocalStorage {
    async fn write_dataset(&self, scraper: &str, dataset: &Dataset) -> Result<PathBuf> {
        let key = format!(
            "{}/{}.json",
            Self::scraper_key(scraper)?,
            Self::dataset_id(&dataset.source_url)
        );
        self.write_json(&key, dataset).await
    }
}
