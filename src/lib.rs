//! Batch utilities that prepare stimulus media for an acquisition system.
/// Application directory helpers.
pub mod app_dirs;
/// Audio decoding, downmixing, resampling and WAV output.
pub mod audio;
/// Configuration loading and the media tree layout.
pub mod config;
/// Short stereo cue-tone generation.
pub mod cue;
/// Genre-based file routing.
pub mod genre;
/// Logging setup.
pub mod logging;
/// Playlist manifest building.
pub mod manifest;
/// Per-file stimulus assembly pipeline.
pub mod pipeline;
/// Descriptive tag reading and writing.
pub mod tags;
/// Trigger pulse train layout and serialization.
pub mod trigger;
/// ffmpeg/ffprobe invocation for video work.
pub mod video;
