//! The per-stimulus metadata record, in the playback system's wire format.

use serde::{Deserialize, Serialize};

/// One manifest entry. Field names and order are the wire format consumed
/// by the playback side; absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StimulusRecord {
    pub filename: String,
    /// Category folder the file was found in.
    pub stim_type: String,
    /// File extension including the leading dot.
    pub format: String,
    pub duration: Option<f64>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub channels: Option<u8>,
    /// Audio bitrate in kbit/s.
    pub bitrate: Option<u32>,
    /// Byte offset of the audio payload. Not reported by the tag layer;
    /// kept for wire compatibility and always `null`.
    pub audio_offset: Option<u64>,
    pub filesize: Option<u64>,
    pub samplerate: Option<u32>,
    /// Cover image filename under the images tree, if one matched.
    pub album_cover: Option<String>,
    pub priority: bool,
}

impl StimulusRecord {
    /// Ordering key within a category. Missing artist and album sort as
    /// empty strings, ahead of everything else.
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (
            self.artist.as_deref().unwrap_or(""),
            self.album.as_deref().unwrap_or(""),
            &self.filename,
        )
    }
}
