//! Container inspection via ffprobe.

use std::ffi::OsString;
use std::path::Path;

use serde::Deserialize;

use super::command::{self, VideoError};

/// Stream geometry and timing for a video file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
}

fn probe_args(path: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        "quiet".into(),
        "-print_format".into(),
        "json".into(),
        "-show_format".into(),
        "-show_streams".into(),
        path.as_os_str().to_os_string(),
    ]
}

fn run_probe(path: &Path) -> Result<ProbeOutput, VideoError> {
    let output = command::run("ffprobe", probe_args(path))?;
    serde_json::from_slice(&output.stdout).map_err(|err| VideoError::UnexpectedOutput {
        tool: "ffprobe",
        detail: err.to_string(),
    })
}

/// Parse an ffprobe rational such as `30000/1001`. Zero denominators fall
/// back to 25 fps, which some containers report for still streams.
fn parse_frame_rate(raw: &str) -> Option<f64> {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 || num == 0.0 {
            return Some(25.0);
        }
        return Some(num / den);
    }
    raw.trim().parse().ok()
}

/// Probe a video file for duration, dimensions and frame rate.
pub fn probe_video(path: &Path) -> Result<VideoInfo, VideoError> {
    let probed = run_probe(path)?;
    let duration_seconds = parse_duration(&probed)?;

    let stream = probed
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| VideoError::UnexpectedOutput {
            tool: "ffprobe",
            detail: format!("no video stream in {}", path.display()),
        })?;
    let (width, height) = match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
        _ => {
            return Err(VideoError::UnexpectedOutput {
                tool: "ffprobe",
                detail: format!("missing dimensions for {}", path.display()),
            });
        }
    };
    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(25.0);

    Ok(VideoInfo {
        duration_seconds,
        width,
        height,
        fps,
    })
}

/// Probe only the container duration, in seconds.
pub fn probe_duration(path: &Path) -> Result<f64, VideoError> {
    let probed = run_probe(path)?;
    parse_duration(&probed)
}

fn parse_duration(probed: &ProbeOutput) -> Result<f64, VideoError> {
    probed
        .format
        .as_ref()
        .and_then(|format| format.duration.as_deref())
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .ok_or_else(|| VideoError::UnexpectedOutput {
            tool: "ffprobe",
            detail: "no container duration".to_string(),
        })
}
