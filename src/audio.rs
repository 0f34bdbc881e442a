//! Audio decoding, downmixing, resampling and WAV output.

use std::path::Path;

use thiserror::Error;

pub mod decode;
pub mod resample;
pub mod wav;

pub use decode::{DecodeError, DecodedAudio, decode_audio};
pub use resample::{ResampleError, resample_mono};
pub use wav::{WavError, write_stereo_wav};

/// Errors from the combined load-and-condition path.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Resample(#[from] ResampleError),
    #[error(transparent)]
    Wav(#[from] WavError),
}

/// Decode a media file to mono `f32` at `target_rate`, downmixing and
/// resampling as needed.
pub fn load_mono(path: &Path, target_rate: u32) -> Result<Vec<f32>, AudioError> {
    let decoded = decode_audio(path)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    if decoded.sample_rate == target_rate {
        return Ok(mono);
    }
    Ok(resample_mono(&mono, decoded.sample_rate, target_rate)?)
}

/// Average interleaved channels down to mono. Mono input is passed through.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Prepend `silence_duration` seconds of zeros to a mono signal.
pub fn prepend_silence(samples: Vec<f32>, sample_rate: u32, silence_duration: f64) -> Vec<f32> {
    let lead_in = (silence_duration * f64::from(sample_rate)).round() as usize;
    let mut padded = vec![0.0; lead_in];
    padded.extend(samples);
    padded
}
