//! WAV output via hound.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

/// Errors that can occur while writing a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("Channel lengths differ: left {left} vs right {right} samples")]
    ChannelMismatch { left: usize, right: usize },
    #[error("Failed to write WAV {path}: {source}")]
    Write {
        path: PathBuf,
        source: hound::Error,
    },
}

/// Write a stereo 32-bit float WAV from two equal-length channels.
///
/// Float output keeps the unit-amplitude trigger pulses intact; integer PCM
/// would clip them against full-scale audio.
pub fn write_stereo_wav(
    path: &Path,
    sample_rate: u32,
    left: &[f32],
    right: &[f32],
) -> Result<(), WavError> {
    if left.len() != right.len() {
        return Err(WavError::ChannelMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let map_err = |source| WavError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WavWriter::create(path, spec).map_err(map_err)?;
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample(l).map_err(map_err)?;
        writer.write_sample(r).map_err(map_err)?;
    }
    writer.finalize().map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_stereo_float_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let left = vec![0.0, 0.5, -0.5];
        let right = vec![1.0, 0.0, 1.0];
        write_stereo_wav(&path, 44_100, &left, &right).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0.0, 1.0, 0.5, 0.0, -0.5, 1.0]);
    }

    #[test]
    fn rejects_mismatched_channel_lengths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let err = write_stereo_wav(&path, 44_100, &[0.0], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, WavError::ChannelMismatch { .. }));
    }
}
