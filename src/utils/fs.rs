//! File system utilities.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Save data to a JSON file with pretty printing, creating parent directories.
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// List every JSON file below `root`, sorted by path.
///
/// A missing root yields an empty list.
pub fn traverse_output(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Read a plain-text path list, one path per line, blank lines ignored.
pub fn read_path_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Name of the directory directly containing `path`.
pub fn parent_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_traverse_output_finds_nested_json() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("ocr/sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("ocr/a.json"), "{}").unwrap();
        fs::write(nested.join("b.json"), "{}").unwrap();
        fs::write(tmp.path().join("ocr/notes.txt"), "x").unwrap();

        let files = traverse_output(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "json"));
    }

    #[test]
    fn test_traverse_missing_root() {
        let tmp = TempDir::new().unwrap();
        let files = traverse_output(&tmp.path().join("missing")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_read_path_list() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("dedup.lst");
        fs::write(&list, "out/ocr/a.json\n\nout/nces/b.json  \n").unwrap();

        let paths = read_path_list(&list).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("out/ocr/a.json"), PathBuf::from("out/nces/b.json")]
        );
    }

    #[test]
    fn test_parent_name() {
        assert_eq!(
            parent_name(Path::new("output/scrapers/ocr/abc.json")),
            Some("ocr".to_string())
        );
        assert_eq!(parent_name(Path::new("abc.json")), None);
    }
}
