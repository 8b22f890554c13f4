//! Statistics workbook.
//!
//! A single JSON document holding named sheets. Sheets are only ever
//! appended: a name already present gets a numeric suffix (`NAME1`, `NAME2`,
//! ...) so earlier runs stay readable. All writers in the process share one
//! lock, and every write replaces the file atomically.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{StatRow, StatTable};
use crate::utils::fs::ensure_parent;

/// Serializes every workbook read-modify-write in the process.
static WORKBOOK_LOCK: Mutex<()> = Mutex::new(());

/// One statistic table as stored in the workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<StatRow>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub degraded: bool,
}

/// Collection of sheets, in the order they were appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    fn contains(&self, name: &str) -> bool {
        self.sheets.iter().any(|sheet| sheet.name == name)
    }

    /// `name`, or `name` with the smallest numeric suffix not yet taken.
    fn unique_name(&self, name: &str) -> String {
        if !self.contains(name) {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

/// Appends statistic tables to a workbook file.
#[derive(Debug, Clone)]
pub struct WorkbookWriter {
    path: PathBuf,
    csv_export: bool,
}

impl WorkbookWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            csv_export: false,
        }
    }

    /// Also write each appended sheet as `<workbook stem>-<sheet>.csv`.
    pub fn with_csv_export(mut self, enabled: bool) -> Self {
        self.csv_export = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the workbook; a missing file is an empty workbook.
    pub fn load(&self) -> Result<Workbook> {
        let _guard = WORKBOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        self.read()
    }

    /// Delete the workbook file if it exists.
    pub fn reset(&self) -> Result<()> {
        let _guard = WORKBOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Removed workbook {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append `table` as a new sheet, returning the sheet name used.
    pub fn append(&self, table: &StatTable) -> Result<String> {
        let _guard = WORKBOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let mut workbook = self.read()?;
        let name = workbook.unique_name(table.kind.sheet_name());
        let sheet = Sheet {
            name: name.clone(),
            columns: table.kind.columns().iter().map(|c| c.to_string()).collect(),
            rows: table.rows.clone(),
            created_at: Utc::now(),
            degraded: table.degraded,
        };

        if self.csv_export {
            self.write_csv(&sheet)?;
        }

        workbook.sheets.push(sheet);
        self.write(&workbook)?;
        log::debug!("Appended sheet '{}' to {}", name, self.path.display());
        Ok(name)
    }

    fn read(&self) -> Result<Workbook> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Workbook::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write atomically (write to temp, then rename).
    fn write(&self, workbook: &Workbook) -> Result<()> {
        ensure_parent(&self.path)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(workbook)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn csv_path(&self, sheet_name: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "metrics".to_string());
        let slug = sheet_name.to_lowercase().replace(' ', "_");
        self.path.with_file_name(format!("{stem}-{slug}.csv"))
    }

    fn write_csv(&self, sheet: &Sheet) -> Result<()> {
        let path = self.csv_path(&sheet.name);
        ensure_parent(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&sheet.columns)?;
        for row in &sheet.rows {
            let count = row.count.to_string();
            writer.write_record(row.keys.iter().map(String::as_str).chain([count.as_str()]))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatKind;
    use tempfile::TempDir;

    fn table(kind: StatKind) -> StatTable {
        StatTable::new(
            kind,
            vec![
                StatRow::new(vec!["ed.gov".to_string()], 3),
                StatRow::new(vec!["nces.ed.gov".to_string()], 1),
            ],
        )
    }

    #[test]
    fn test_append_creates_workbook() {
        let tmp = TempDir::new().unwrap();
        let writer = WorkbookWriter::new(tmp.path().join("tools/stats/metrics.json"));

        let name = writer.append(&table(StatKind::PageCountPerDomain)).unwrap();
        assert_eq!(name, "PAGE COUNT PER DOMAIN");

        let workbook = writer.load().unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert_eq!(workbook.sheets[0].columns, ["domain", "page count"]);
        assert_eq!(workbook.sheets[0].rows.len(), 2);
    }

    #[test]
    fn test_append_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let writer = WorkbookWriter::new(tmp.path().join("metrics.json"));

        writer.append(&table(StatKind::PageCountPerDomain)).unwrap();
        writer.append(&table(StatKind::ResourceCountPerDomain)).unwrap();
        let again = writer.append(&table(StatKind::PageCountPerDomain)).unwrap();
        let third = writer.append(&table(StatKind::PageCountPerDomain)).unwrap();

        assert_eq!(again, "PAGE COUNT PER DOMAIN1");
        assert_eq!(third, "PAGE COUNT PER DOMAIN2");

        let workbook = writer.load().unwrap();
        let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "PAGE COUNT PER DOMAIN",
                "RESOURCE COUNT PER DOMAIN",
                "PAGE COUNT PER DOMAIN1",
                "PAGE COUNT PER DOMAIN2",
            ]
        );
    }

    #[test]
    fn test_reset_removes_file() {
        let tmp = TempDir::new().unwrap();
        let writer = WorkbookWriter::new(tmp.path().join("metrics.json"));

        writer.append(&table(StatKind::PageCountPerDomain)).unwrap();
        writer.reset().unwrap();
        assert!(!writer.path().exists());
        assert!(writer.load().unwrap().sheets.is_empty());

        // Resetting a missing workbook is fine
        writer.reset().unwrap();
    }

    #[test]
    fn test_csv_export() {
        let tmp = TempDir::new().unwrap();
        let writer = WorkbookWriter::new(tmp.path().join("metrics.json")).with_csv_export(true);

        writer.append(&table(StatKind::DatasetCountPerScraper)).unwrap();

        let csv = fs::read_to_string(tmp.path().join("metrics-dataset_count_per_scraper.csv"))
            .unwrap();
        assert_eq!(csv, "scraper,dataset count\ned.gov,3\nnces.ed.gov,1\n");
    }

    #[test]
    fn test_concurrent_appends_keep_every_sheet() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metrics.json");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let writer = WorkbookWriter::new(&path);
                std::thread::spawn(move || {
                    writer.append(&table(StatKind::ResourceCountPerPage)).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let workbook = WorkbookWriter::new(&path).load().unwrap();
        assert_eq!(workbook.sheets.len(), 8);
    }
}
