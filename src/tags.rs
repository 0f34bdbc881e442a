//! Descriptive tag reading and writing via lofty.
//!
//! Tag read failures are expected in the wild (untagged stimuli, odd
//! encoders); callers log them and continue with empty metadata rather than
//! aborting a batch.

use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;
use thiserror::Error;

/// Errors that can occur while reading or writing tags.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Failed to read tags from {path}: {source}")]
    Read {
        path: PathBuf,
        source: lofty::error::LoftyError,
    },
    #[error("Failed to write tags to {path}: {source}")]
    Write {
        path: PathBuf,
        source: lofty::error::LoftyError,
    },
}

/// Descriptive fields carried from source to processed stimulus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StimulusTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
}

/// Stream properties reported by the tag layer.
#[derive(Debug, Clone, Default)]
pub struct MediaProperties {
    pub duration_seconds: Option<f64>,
    pub channels: Option<u8>,
    pub bitrate_kbps: Option<u32>,
    pub sample_rate: Option<u32>,
}

/// Tags plus stream properties for one media file.
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    pub tags: StimulusTags,
    pub properties: MediaProperties,
}

/// Read descriptive tags and audio properties from a media file.
///
/// A file without any tag block yields empty tags, not an error.
pub fn read_metadata(path: &Path) -> Result<FileMetadata, TagError> {
    let tagged = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|source| TagError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let properties = tagged.properties();
    let media_properties = MediaProperties {
        duration_seconds: Some(properties.duration().as_secs_f64()),
        channels: properties.channels(),
        bitrate_kbps: properties.audio_bitrate(),
        sample_rate: properties.sample_rate(),
    };

    let tags = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .map(|tag| StimulusTags {
            title: tag.title().map(|value| value.into_owned()),
            artist: tag.artist().map(|value| value.into_owned()),
            album: tag.album().map(|value| value.into_owned()),
            genre: tag.genre().map(|value| value.into_owned()),
        })
        .unwrap_or_default();

    Ok(FileMetadata {
        tags,
        properties: media_properties,
    })
}

/// Write descriptive tags onto a file, replacing the four carried fields.
///
/// Missing fields are written as empty strings, matching what the playback
/// side expects from processed stimuli.
pub fn write_tags(path: &Path, tags: &StimulusTags) -> Result<(), TagError> {
    let tagged = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|source| TagError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut tag = tagged
        .primary_tag()
        .cloned()
        .unwrap_or_else(|| Tag::new(tagged.primary_tag_type()));
    tag.set_title(tags.title.clone().unwrap_or_default());
    tag.set_artist(tags.artist.clone().unwrap_or_default());
    tag.set_album(tags.album.clone().unwrap_or_default());
    tag.set_genre(tags.genre.clone().unwrap_or_default());

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|source| TagError::Write {
            path: path.to_path_buf(),
            source,
        })
}
