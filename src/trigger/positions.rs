//! Plain-text serialization of trigger positions.
//!
//! One `onset,offset` pair per line, in seconds with six decimal places.
//! The format is shared with the acquisition-side analysis tooling, so it
//! must stay byte-stable across runs.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::TriggerInterval;

/// Errors that can occur while reading or writing a position file.
#[derive(Debug, Error)]
pub enum PositionFileError {
    /// The position file does not exist (replay was requested without one).
    #[error("Trigger position file not found: {path}")]
    Missing { path: PathBuf },
    /// Filesystem failure while reading or writing.
    #[error("Failed to access trigger position file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A line did not parse as a valid `onset,offset` pair of seconds.
    #[error("Malformed line {line_number} in {path}: {line:?}")]
    Parse {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
}

/// Conventional position file path for a stimulus stem: `<stem>_trigger.txt`.
pub fn position_file_path(trigger_dir: &Path, stem: &str) -> PathBuf {
    trigger_dir.join(format!("{stem}_trigger.txt"))
}

/// Write intervals to `path`, overwriting any previous contents.
pub fn write_positions(
    path: &Path,
    intervals: &[TriggerInterval],
) -> Result<(), PositionFileError> {
    let mut data = Vec::with_capacity(intervals.len() * 20);
    for interval in intervals {
        writeln!(data, "{:.6},{:.6}", interval.onset, interval.offset).map_err(|source| {
            PositionFileError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }
    std::fs::write(path, data).map_err(|source| PositionFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read intervals back from `path`. Blank lines are ignored.
pub fn read_positions(path: &Path) -> Result<Vec<TriggerInterval>, PositionFileError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(PositionFileError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(PositionFileError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut intervals = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let interval = parse_line(trimmed).ok_or_else(|| PositionFileError::Parse {
            path: path.to_path_buf(),
            line_number: index + 1,
            line: trimmed.to_string(),
        })?;
        intervals.push(interval);
    }
    Ok(intervals)
}

fn parse_line(line: &str) -> Option<TriggerInterval> {
    let (onset, offset) = line.split_once(',')?;
    let onset: f64 = onset.trim().parse().ok()?;
    let offset: f64 = offset.trim().parse().ok()?;
    // A reversed or negative pair would index the signal backwards when
    // rendered, so it is as unusable as an unparsable line.
    if !onset.is_finite() || !offset.is_finite() || onset < 0.0 || offset < onset {
        return None;
    }
    Some(TriggerInterval { onset, offset })
}
