use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CLIPPINGS_FILE_NAME: &str = "My Clippings.txt";

#[derive(Debug)]
pub enum SourceError {
    NotFound(PathBuf),
    Unreadable(PathBuf, String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::NotFound(path) => {
                write!(f, "No '{}' found at {}", CLIPPINGS_FILE_NAME, path.display())
            }
            SourceError::Unreadable(path, e) => {
                write!(f, "Failed to read {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// A file is taken as-is; a directory (e.g. a mounted Kindle) is searched
/// for clippings files.
pub fn find_clippings_files(path: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy() == CLIPPINGS_FILE_NAME)
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    Ok(files)
}

/// Reads a clippings file as UTF-8, dropping the byte-order mark Kindles write.
pub fn read_clippings(path: &Path) -> Result<String, SourceError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SourceError::Unreadable(path.to_path_buf(), e.to_string()))?;

    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}
