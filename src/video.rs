//! Video stimulus assembly through the ffmpeg tool suite.
//!
//! All invocations are synchronous; a batch run processes one file at a
//! time and waits for each encode to finish.

use std::ffi::OsString;
use std::path::Path;

pub mod command;
pub mod probe;
pub mod thumbnail;

pub use command::VideoError;
pub use probe::{VideoInfo, probe_duration, probe_video};
pub use thumbnail::{ThumbnailSummary, extract_frame, generate_thumbnails};

/// Encoder settings for assembled stimuli.
#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub video_bitrate: String,
    pub preset: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_bitrate: "5000k".to_string(),
            preset: "veryfast".to_string(),
        }
    }
}

fn assemble_args(
    original: &Path,
    audio: &Path,
    output: &Path,
    lead_in_seconds: f64,
    info: &VideoInfo,
    settings: &EncodeSettings,
) -> Vec<OsString> {
    let filter = format!(
        "color=black:size={w}x{h}:rate={fps:.3}:duration={lead:.6}[lead];\
         [lead][0:v]concat=n=2:v=1:a=0[v]",
        w = info.width,
        h = info.height,
        fps = info.fps,
        lead = lead_in_seconds,
    );
    vec![
        "-y".into(),
        "-i".into(),
        original.as_os_str().to_os_string(),
        "-i".into(),
        audio.as_os_str().to_os_string(),
        "-filter_complex".into(),
        filter.into(),
        "-map".into(),
        "[v]".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        settings.preset.clone().into(),
        "-b:v".into(),
        settings.video_bitrate.clone().into(),
        "-c:a".into(),
        "aac".into(),
        output.as_os_str().to_os_string(),
    ]
}

/// Re-encode a video with a black lead-in prepended to the picture and the
/// prepared stereo track (audio plus trigger channel) replacing the audio.
///
/// The audio file is expected to already carry its own lead-in, so picture
/// and sound stay aligned.
pub fn assemble_with_lead_in(
    original: &Path,
    audio: &Path,
    output: &Path,
    lead_in_seconds: f64,
    info: &VideoInfo,
    settings: &EncodeSettings,
) -> Result<(), VideoError> {
    command::run(
        "ffmpeg",
        assemble_args(original, audio, output, lead_in_seconds, info, settings),
    )?;
    Ok(())
}

/// Copy container metadata from the original file onto a processed one.
///
/// ffmpeg cannot edit in place, so the remux goes through a temporary file
/// beside the target which then replaces it.
pub fn copy_container_metadata(original: &Path, processed: &Path) -> Result<(), VideoError> {
    let parent = processed.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix("remux_")
        .suffix(".mp4")
        .tempfile_in(parent)
        .map_err(|source| VideoError::Replace {
            path: processed.to_path_buf(),
            source,
        })?;
    let temp_path = temp.into_temp_path();

    let args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        original.as_os_str().to_os_string(),
        "-i".into(),
        processed.as_os_str().to_os_string(),
        "-map_metadata".into(),
        "0".into(),
        "-c".into(),
        "copy".into(),
        "-map".into(),
        "1:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        temp_path.as_os_str().to_os_string(),
    ];
    command::run("ffmpeg", args)?;

    temp_path
        .persist(processed)
        .map_err(|err| VideoError::Replace {
            path: processed.to_path_buf(),
            source: err.error,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn assembly_filter_describes_the_lead_in() {
        let info = VideoInfo {
            duration_seconds: 10.0,
            width: 1920,
            height: 1080,
            fps: 29.97,
        };
        let args = assemble_args(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("track.wav"),
            &PathBuf::from("out.mp4"),
            3.0,
            &info,
            &EncodeSettings::default(),
        );
        let filter_index = args.iter().position(|arg| arg == "-filter_complex").unwrap();
        let filter = args[filter_index + 1].to_string_lossy();
        assert!(filter.contains("color=black:size=1920x1080"));
        assert!(filter.contains("rate=29.970"));
        assert!(filter.contains("duration=3.000000"));
        assert!(filter.contains("concat=n=2"));
    }

    #[test]
    fn assembly_maps_the_prepared_audio_track() {
        let info = VideoInfo {
            duration_seconds: 5.0,
            width: 640,
            height: 480,
            fps: 25.0,
        };
        let args = assemble_args(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("track.wav"),
            &PathBuf::from("out.mp4"),
            3.0,
            &info,
            &EncodeSettings::default(),
        );
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let audio_map = rendered.windows(2).any(|w| w == ["-map", "1:a:0"]);
        assert!(audio_map, "audio must come from the prepared track");
        assert!(rendered.contains(&"libx264".to_string()));
        assert!(rendered.contains(&"5000k".to_string()));
    }
}
