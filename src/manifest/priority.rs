//! Priority stimulus list, read from a CSV file with a `filename` column.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Errors that can occur while reading the priority list.
#[derive(Debug, Error)]
pub enum PriorityError {
    #[error("Failed to read priority list {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },
    #[error("Priority list {path} has no `filename` column")]
    MissingColumn { path: PathBuf },
}

/// Read the set of priority filenames from a CSV file.
pub fn read_priority_set(path: &Path) -> Result<HashSet<String>, PriorityError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| PriorityError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let headers = reader.headers().map_err(|source| PriorityError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let column = headers
        .iter()
        .position(|header| header.trim() == "filename")
        .ok_or_else(|| PriorityError::MissingColumn {
            path: path.to_path_buf(),
        })?;

    let mut set = HashSet::new();
    for row in reader.records() {
        let row = row.map_err(|source| PriorityError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(value) = row.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        }
    }
    info!("Loaded {} priority filenames from {}", set.len(), path.display());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_the_filename_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("priorities.csv");
        std::fs::write(&path, "rank,filename\n1,first.wav\n2, second.mp3 \n3,\n").unwrap();

        let set = read_priority_set(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("first.wav"));
        assert!(set.contains("second.mp3"));
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("priorities.csv");
        std::fs::write(&path, "file\nfirst.wav\n").unwrap();
        assert!(matches!(
            read_priority_set(&path),
            Err(PriorityError::MissingColumn { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_priority_set(&dir.path().join("absent.csv")),
            Err(PriorityError::Read { .. })
        ));
    }
}
