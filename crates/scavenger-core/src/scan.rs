//! Candidate file enumeration for batch runs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};
use glob::{glob, Pattern};
use tracing::{debug, warn};

use crate::error::{Result, ScavengerError};
use crate::models::config::ScanConfig;

/// Recursively collect files under `root` that pass `config`.
///
/// Names containing `$` are office lock files and always skipped. The result
/// is sorted so repeated runs visit files in the same order.
pub fn collect_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*", Pattern::escape(&root.to_string_lossy()));
    let entries = glob(&pattern).map_err(|e| ScavengerError::Config(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if accepts(&path, config) {
            files.push(path);
        } else {
            debug!("Filtered out {}", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Whether a single file passes the name, extension, and age filters.
pub fn accepts(path: &Path, config: &ScanConfig) -> bool {
    let Some(name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };

    if name.contains('$') {
        return false;
    }
    if config.excludes.iter().any(|exclude| name.contains(exclude.as_str())) {
        return false;
    }
    if !config.includes.iter().all(|include| name.contains(include.as_str())) {
        return false;
    }
    if !has_extension(path, &config.extensions) {
        return false;
    }

    match config.oldest_year {
        Some(oldest) => modified_year(path).is_some_and(|year| year >= oldest),
        None => true,
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Local-time year of the file's last modification.
fn modified_year(path: &Path) -> Option<i32> {
    match path.metadata().and_then(|meta| meta.modified()) {
        Ok(modified) => Some(DateTime::<Local>::from(modified).year()),
        Err(e) => {
            warn!("Cannot read modification time of {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_collects_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/contract.xlsx");
        touch(dir.path(), "a/deep/client.xlsx");
        touch(dir.path(), "notes.txt");

        let files = collect_files(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(names(&files), vec!["client.xlsx", "contract.xlsx"]);
    }

    #[test]
    fn test_lock_files_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "~$client.xlsx");
        touch(dir.path(), "client 견적서.xlsx");
        touch(dir.path(), "client Fin 합.xlsx");
        touch(dir.path(), "client.xlsx");

        let config = ScanConfig {
            excludes: vec!["견적서".to_string(), "Fin 합".to_string()],
            ..ScanConfig::default()
        };
        let files = collect_files(dir.path(), &config).unwrap();
        assert_eq!(names(&files), vec!["client.xlsx"]);
    }

    #[test]
    fn test_includes_must_all_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2023 client contract.xlsx");
        touch(dir.path(), "2023 client.xlsx");

        let config = ScanConfig {
            includes: vec!["client".to_string(), "contract".to_string()],
            ..ScanConfig::default()
        };
        let files = collect_files(dir.path(), &config).unwrap();
        assert_eq!(names(&files), vec!["2023 client contract.xlsx"]);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let upper = touch(dir.path(), "CLIENT.XLSX");
        let ods = touch(dir.path(), "client.ods");

        assert!(accepts(&upper, &ScanConfig::default()));
        assert!(!accepts(&ods, &ScanConfig::default()));
    }

    #[test]
    fn test_oldest_year() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = touch(dir.path(), "client.xlsx");
        let this_year = Utc::now().year();

        let recent = ScanConfig {
            oldest_year: Some(this_year - 1),
            ..ScanConfig::default()
        };
        let future = ScanConfig {
            oldest_year: Some(this_year + 2),
            ..ScanConfig::default()
        };
        assert!(accepts(&fresh, &recent));
        assert!(!accepts(&fresh, &future));
    }
}
