use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extensions the loader understands (compared case-insensitively).
pub const TABULAR_EXTENSIONS: &[&str] = &["csv", "json", "parquet", "pq"];

fn is_tabular(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            TABULAR_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List the names of tabular files directly under `dir`.
///
/// Names are returned in directory listing order. A missing directory
/// yields an empty list, not an error.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        log::warn!("Data directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.context("reading directory entry")?;
        let path = entry.path();
        if !path.is_file() || !is_tabular(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Full path of a catalog entry.
pub fn resolve(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
