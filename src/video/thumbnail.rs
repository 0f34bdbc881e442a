//! Single-frame extraction for thumbnails.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::command::{self, VideoError};
use super::probe;

fn frame_args(video: &Path, output: &Path, at_seconds: f64, height: Option<u32>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-ss".into(),
        format!("{at_seconds:.3}").into(),
        "-i".into(),
        video.as_os_str().to_os_string(),
        "-frames:v".into(),
        "1".into(),
    ];
    if let Some(height) = height {
        args.push("-vf".into());
        // -2 keeps the width even, which jpeg and most players require.
        args.push(format!("scale=-2:{height}").into());
    }
    args.push(output.as_os_str().to_os_string());
    args
}

/// Extract one frame at `at_seconds` into an image file, optionally scaled
/// to a fixed height with the aspect ratio preserved.
pub fn extract_frame(
    video: &Path,
    output: &Path,
    at_seconds: f64,
    height: Option<u32>,
) -> Result<(), VideoError> {
    command::run("ffmpeg", frame_args(video, output, at_seconds, height))?;
    Ok(())
}

/// Counters for one thumbnail batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSummary {
    pub written: usize,
    /// Thumbnail already existed and `overwrite` was not requested.
    pub skipped_existing: usize,
    pub failed: usize,
}

/// Extract a thumbnail for every video, a fifth of the way in.
///
/// A video that cannot be probed or decoded is logged and counted; the
/// batch continues with the rest, matching the stimulus pipeline's
/// per-file failure policy.
pub fn generate_thumbnails(
    videos: &[PathBuf],
    thumbnail_dir: &Path,
    height: Option<u32>,
    overwrite: bool,
) -> ThumbnailSummary {
    let mut summary = ThumbnailSummary::default();
    for video in videos {
        let Some(stem) = video.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let thumbnail = thumbnail_dir.join(format!("{stem}.jpg"));
        if thumbnail.exists() && !overwrite {
            summary.skipped_existing += 1;
            continue;
        }
        let result = probe::probe_duration(video)
            .and_then(|duration| extract_frame(video, &thumbnail, duration / 5.0, height));
        match result {
            Ok(()) => summary.written += 1,
            Err(err) => {
                warn!("Skipping thumbnail for {}: {err}", video.display());
                summary.failed += 1;
            }
        }
    }
    summary
}
