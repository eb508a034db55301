//! File discovery for batch runs.
//!
//! Hotels are identified by naming convention, not metadata: a flat export
//! directory carries the hotel in the filename stem up to the first `_`
//! (`Bhandari_detailed_prices_20250601.xlsx`), while scraper drops nest one
//! directory per hotel and the directory name is the label.

use crate::IngestError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One discovered spreadsheet with its hotel label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotelFile {
    pub path: PathBuf,
    pub hotel: String,
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn hotel_from_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.split('_').next().unwrap_or(stem).to_string()
}

/// List xlsx files directly under `dir`, optionally requiring a filename
/// substring (`detailed_prices` in the comparison flow).
///
/// Results are sorted by filename so batch output is deterministic. An empty
/// result is an error: a run over nothing is a misconfigured path, not a
/// report.
pub fn discover_xlsx(dir: &Path, filter: Option<&str>) -> Result<Vec<HotelFile>, IngestError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_xlsx(&path) {
            continue;
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if let Some(needle) = filter {
            if !file_name.contains(needle) {
                continue;
            }
        }
        files.push(HotelFile { hotel: hotel_from_stem(&path), path });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if files.is_empty() {
        return Err(IngestError::NoFiles(dir.to_path_buf()));
    }
    debug!(dir = %dir.display(), count = files.len(), "discovered spreadsheets");
    Ok(files)
}

/// Walk `dir` recursively; the hotel label is the parent directory name.
pub fn discover_recursive(dir: &Path) -> Result<Vec<HotelFile>, IngestError> {
    fn walk(dir: &Path, files: &mut Vec<HotelFile>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, files)?;
            } else if is_xlsx(&path) {
                let hotel = path
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                files.push(HotelFile { path, hotel });
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if files.is_empty() {
        return Err(IngestError::NoFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Split discovered files into subject and competitor sets by a
/// case-insensitive keyword match on the filename.
pub fn classify(files: Vec<HotelFile>, subject_keyword: &str) -> (Vec<HotelFile>, Vec<HotelFile>) {
    let needle = subject_keyword.to_lowercase();
    files.into_iter().partition(|file| {
        file.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_lowercase)
            .is_some_and(|name| name.contains(&needle))
    })
}
