//! Genre-based routing of processed stimuli into category folders.
//!
//! Files are copied, never moved: `stimuli_with_triggers` stays the canonical
//! archive and `Create_Playlists/media` holds the playback layout.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MediaTree;
use crate::tags;

/// Errors that can occur while routing files.
#[derive(Debug, Error)]
pub enum GenreError {
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Counters for one routing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteSummary {
    pub copied: usize,
    /// Genre absent or not present in the mapping.
    pub unmapped: usize,
    /// Destination already existed and `overwrite` was not requested.
    pub skipped_existing: usize,
}

/// Copy every processed stimulus whose genre tag matches a mapping key into
/// the mapped category folder under `Create_Playlists/media`.
pub fn route_by_genre(
    tree: &MediaTree,
    genres: &BTreeMap<String, String>,
    overwrite: bool,
) -> Result<RouteSummary, GenreError> {
    let input_dir = tree.stimulus_paths().output_dir;
    let media_dir = tree.playlist_media();

    let mut files: Vec<PathBuf> = std::fs::read_dir(&input_dir)
        .map_err(|source| GenreError::Scan {
            path: input_dir.clone(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut summary = RouteSummary::default();
    for file in &files {
        let genre = match tags::read_metadata(file) {
            Ok(metadata) => metadata.tags.genre,
            Err(err) => {
                warn!("Skipping {}: {err}", file.display());
                summary.unmapped += 1;
                continue;
            }
        };
        let Some(category) = genre.as_deref().and_then(|genre| genres.get(genre)) else {
            debug!(
                "Skipping {}, genre {:?} is not mapped",
                file.display(),
                genre
            );
            summary.unmapped += 1;
            continue;
        };

        let destination_dir = media_dir.join(category);
        std::fs::create_dir_all(&destination_dir).map_err(|source| GenreError::CreateDir {
            path: destination_dir.clone(),
            source,
        })?;

        let Some(name) = file.file_name() else {
            continue;
        };
        let destination = destination_dir.join(name);
        if destination.exists() && !overwrite {
            info!(
                "Skipped {}, already in {}",
                destination.display(),
                destination_dir.display()
            );
            summary.skipped_existing += 1;
            continue;
        }

        std::fs::copy(file, &destination).map_err(|source| GenreError::Copy {
            from: file.clone(),
            to: destination.clone(),
            source,
        })?;
        info!("Copied {} to {}", file.display(), destination_dir.display());
        summary.copied += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tags::StimulusTags;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::Path;
    use tempfile::tempdir;

    fn write_tagged_wav(path: &Path, genre: Option<&str>) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..441 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
        if let Some(genre) = genre {
            let tags = StimulusTags {
                genre: Some(genre.into()),
                ..StimulusTags::default()
            };
            tags::write_tags(path, &tags).unwrap();
        }
    }

    fn prepared_tree(root: &Path) -> MediaTree {
        let tree = MediaTree::new(root.to_path_buf());
        std::fs::create_dir_all(tree.stimulus_paths().output_dir).unwrap();
        tree
    }

    #[test]
    fn copies_mapped_genres_and_skips_the_rest() {
        let root = tempdir().unwrap();
        let tree = prepared_tree(root.path());
        let stim_dir = tree.stimulus_paths().output_dir;
        write_tagged_wav(&stim_dir.join("song.wav"), Some("Musique"));
        write_tagged_wav(&stim_dir.join("talk.wav"), Some("Podcast"));
        write_tagged_wav(&stim_dir.join("odd.wav"), Some("Field recordings"));
        write_tagged_wav(&stim_dir.join("bare.wav"), None);

        let summary = route_by_genre(&tree, &AppConfig::default_genres(), false).unwrap();
        assert_eq!(summary.copied, 2);
        assert_eq!(summary.unmapped, 2);
        assert!(tree.playlist_media().join("Musique").join("song.wav").exists());
        assert!(tree.playlist_media().join("Podcasts").join("talk.wav").exists());
        assert!(!tree.playlist_media().join("Field recordings").exists());
    }

    #[test]
    fn existing_destinations_survive_without_overwrite() {
        let root = tempdir().unwrap();
        let tree = prepared_tree(root.path());
        let stim_dir = tree.stimulus_paths().output_dir;
        write_tagged_wav(&stim_dir.join("song.wav"), Some("Musique"));

        let dest_dir = tree.playlist_media().join("Musique");
        std::fs::create_dir_all(&dest_dir).unwrap();
        std::fs::write(dest_dir.join("song.wav"), b"sentinel").unwrap();

        let summary = route_by_genre(&tree, &AppConfig::default_genres(), false).unwrap();
        assert_eq!(summary.copied, 0);
        assert_eq!(summary.skipped_existing, 1);
        assert_eq!(std::fs::read(dest_dir.join("song.wav")).unwrap(), b"sentinel");

        let summary = route_by_genre(&tree, &AppConfig::default_genres(), true).unwrap();
        assert_eq!(summary.copied, 1);
        assert_ne!(std::fs::read(dest_dir.join("song.wav")).unwrap(), b"sentinel");
    }
}
