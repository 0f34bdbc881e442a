//! Sinc resampling of mono signals via rubato.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while resampling.
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("Failed to construct resampler: {0}")]
    Construct(#[from] rubato::ResamplerConstructionError),
    #[error("Resampling failed: {0}")]
    Process(#[from] rubato::ResampleError),
}

/// Resample a mono signal from `source_rate` to `target_rate` using sinc
/// interpolation. Single-pass: the chunk size equals the input length.
pub fn resample_mono(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, ResampleError> {
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = f64::from(target_rate) / f64::from(source_rate);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)?;

    let input = vec![samples.to_vec()];
    let output = resampler.process(&input, None)?;
    let resampled = output.into_iter().next().unwrap_or_default();
    debug!(
        "Resampled {} frames ({source_rate} Hz) to {} frames ({target_rate} Hz)",
        samples.len(),
        resampled.len()
    );
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_when_rates_match() {
        let samples = vec![0.1, 0.2, 0.3];
        let out = resample_mono(&samples, 44_100, 44_100).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn output_length_tracks_the_rate_ratio() {
        let samples = vec![0.0; 22_050];
        let out = resample_mono(&samples, 22_050, 44_100).unwrap();
        let expected = samples.len() * 2;
        let tolerance = expected / 50;
        assert!(
            out.len().abs_diff(expected) <= tolerance,
            "got {} frames, expected about {expected}",
            out.len()
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = resample_mono(&[], 48_000, 44_100).unwrap();
        assert!(out.is_empty());
    }
}
