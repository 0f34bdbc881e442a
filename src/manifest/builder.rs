//! Scans the playlist media tree and assembles the manifest.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{MediaTree, PlaylistSettings};
use crate::tags::{self, FileMetadata};
use crate::video;

use super::covers::resolve_cover;
use super::priority::{PriorityError, read_priority_set};
use super::record::StimulusRecord;

/// Category name to `{filename: record}`, in insertion order.
pub type Manifest = serde_json::Map<String, Value>;

/// Errors that can occur while building or writing the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Priority(#[from] PriorityError),
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn scan_err(path: &Path) -> impl Fn(std::io::Error) -> ManifestError + '_ {
    move |source| ManifestError::Scan {
        path: path.to_path_buf(),
        source,
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(scan_err(dir))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    paths.sort();
    Ok(paths)
}

/// The file extension with its leading dot, as stored on disk.
fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

fn matches_extensions(extension: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(extension))
}

fn build_record(
    path: &Path,
    category: &str,
    extension: &str,
    tree: &MediaTree,
    priority: &HashSet<String>,
) -> StimulusRecord {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = match tags::read_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!("Continuing with empty metadata: {err}");
            FileMetadata::default()
        }
    };

    let is_video = extension.eq_ignore_ascii_case(".mp4");
    let duration = if is_video {
        match video::probe_duration(path) {
            Ok(duration) => Some(duration),
            Err(err) => {
                warn!("Falling back to tag duration for {filename}: {err}");
                metadata.properties.duration_seconds
            }
        }
    } else {
        metadata.properties.duration_seconds
    };

    let cover_dir = if is_video {
        tree.video_thumbnails()
    } else {
        tree.album_covers()
    };
    let album_cover = resolve_cover(
        &cover_dir,
        metadata.tags.album.as_deref(),
        metadata.tags.artist.as_deref(),
        &file_stem,
    );

    let filesize = std::fs::metadata(path).ok().map(|meta| meta.len());
    let priority = priority.contains(&filename);

    StimulusRecord {
        filename,
        stim_type: category.to_string(),
        format: extension.to_string(),
        duration,
        artist: metadata.tags.artist,
        album: metadata.tags.album,
        title: metadata.tags.title,
        channels: metadata.properties.channels,
        bitrate: metadata.properties.bitrate_kbps,
        audio_offset: None,
        filesize,
        samplerate: metadata.properties.sample_rate,
        album_cover,
        priority,
    }
}

/// Build the manifest by scanning every category folder under
/// `Create_Playlists/media`.
pub fn build_manifest(
    tree: &MediaTree,
    settings: &PlaylistSettings,
) -> Result<Manifest, ManifestError> {
    let priority = match &settings.priority_list {
        Some(path) => read_priority_set(path)?,
        None => HashSet::new(),
    };

    let media_dir = tree.playlist_media();
    info!("Parsing {}", media_dir.display());

    let mut manifest = Manifest::new();
    for category_dir in sorted_entries(&media_dir)? {
        if !category_dir.is_dir() {
            continue;
        }
        let Some(category) = category_dir
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
        else {
            continue;
        };
        info!("Collecting category {category}");

        let mut records = Vec::new();
        for path in sorted_entries(&category_dir)? {
            if !path.is_file() {
                continue;
            }
            let Some(extension) = dotted_extension(&path) else {
                continue;
            };
            if !matches_extensions(&extension, &settings.extensions) {
                continue;
            }
            records.push(build_record(&path, &category, &extension, tree, &priority));
        }
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut entries = Manifest::new();
        for record in records {
            entries.insert(record.filename.clone(), serde_json::to_value(&record)?);
        }
        manifest.insert(category, Value::Object(entries));
    }
    Ok(manifest)
}

/// Write the manifest as pretty-printed JSON with four-space indentation,
/// replacing any previous file.
pub fn write_manifest(
    manifest: &Manifest,
    metadata_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ManifestError> {
    std::fs::create_dir_all(metadata_dir).map_err(|source| ManifestError::CreateDir {
        path: metadata_dir.to_path_buf(),
        source,
    })?;
    let path = metadata_dir.join(filename);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest.serialize(&mut serializer)?;

    std::fs::write(&path, &buf).map_err(|source| ManifestError::Write {
        path: path.clone(),
        source,
    })?;
    info!("Saved playlist as {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_wav(path: &Path) {
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
    }

    #[test]
    fn scans_categories_and_marks_priority() {
        let root = tempdir().unwrap();
        let tree = MediaTree::new(root.path().to_path_buf());
        let category = tree.playlist_media().join("Musique");
        std::fs::create_dir_all(&category).unwrap();
        write_wav(&category.join("one.wav"));
        write_wav(&category.join("two.wav"));
        std::fs::write(category.join("notes.txt"), b"ignored").unwrap();

        let csv_path = root.path().join("priorities.csv");
        std::fs::write(&csv_path, "filename\ntwo.wav\n").unwrap();
        let settings = PlaylistSettings {
            priority_list: Some(csv_path),
            ..PlaylistSettings::default()
        };

        let manifest = build_manifest(&tree, &settings).unwrap();
        let musique = manifest["Musique"].as_object().unwrap();
        assert_eq!(musique.len(), 2);
        assert_eq!(musique["one.wav"]["priority"], false);
        assert_eq!(musique["two.wav"]["priority"], true);
        assert_eq!(musique["one.wav"]["stim_type"], "Musique");
        assert_eq!(musique["one.wav"]["format"], ".wav");
        assert!(musique["one.wav"]["album_cover"].is_null());
        assert_eq!(musique["one.wav"]["samplerate"], 44_100);
    }

    #[test]
    fn manifest_json_uses_four_space_indent() {
        let root = tempdir().unwrap();
        let mut manifest = Manifest::new();
        manifest.insert("Musique".into(), serde_json::json!({}));
        let path = write_manifest(&manifest, &root.path().join("metadata"), "metadata.json").unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("{\n    \"Musique\""), "got: {text}");
    }

    #[test]
    fn empty_media_dir_is_a_scan_error() {
        let root = tempdir().unwrap();
        let tree = MediaTree::new(root.path().join("nowhere"));
        assert!(matches!(
            build_manifest(&tree, &PlaylistSettings::default()),
            Err(ManifestError::Scan { .. })
        ));
    }
}
