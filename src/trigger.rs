//! Trigger pulse train layout, rendering, and position-file serialization.
//!
//! The acquisition system aligns recordings against a second audio channel
//! that carries short rectangular pulses: a fixed run of start markers
//! followed by randomly spaced pulses and one forced pulse at the very end
//! of the signal. Positions are persisted to a text file so a signal can be
//! regenerated deterministically later.

use std::path::Path;

use rand::Rng;

pub mod positions;
pub mod schedule;
pub mod signal;

pub use positions::{PositionFileError, position_file_path, read_positions, write_positions};
pub use schedule::{LayoutError, layout_intervals};
pub use signal::render;

/// Parameters governing pulse layout. Passed explicitly so the generator
/// stays pure and independently testable.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerParams {
    /// Pulse amplitude, 0 to 1.
    pub amplitude: f32,
    /// Pulse width in seconds.
    pub pulse_duration: f64,
    /// Minimum random spacing between consecutive pulses, in seconds.
    pub min_spacing: f64,
    /// Maximum random spacing between consecutive pulses, in seconds.
    pub max_spacing: f64,
    /// Absolute positions of the fixed start markers, in seconds, ascending.
    pub initial_positions: Vec<f64>,
}

/// One pulse as an `(onset, offset)` pair in seconds, quantized to 1 µs so
/// the six-decimal text serialization round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerInterval {
    pub onset: f64,
    pub offset: f64,
}

impl TriggerInterval {
    /// Build an interval starting at `position` with the given width.
    pub fn at(position: f64, pulse_duration: f64) -> Self {
        Self {
            onset: quantize(position),
            offset: quantize(position + pulse_duration),
        }
    }

    /// The half-open sample range covered by this interval.
    pub fn sample_span(&self, sample_rate: u32) -> (usize, usize) {
        let rate = f64::from(sample_rate);
        (
            (self.onset * rate).round() as usize,
            (self.offset * rate).round() as usize,
        )
    }
}

/// Round a time in seconds to the 1 µs grid used by the position files.
pub fn quantize(seconds: f64) -> f64 {
    (seconds * 1e6).round() / 1e6
}

/// A rendered pulse signal together with the intervals that produced it.
#[derive(Debug, Clone)]
pub struct TriggerTrain {
    /// Sample-indexed signal: zero outside pulses, amplitude inside.
    pub signal: Vec<f32>,
    /// Ordered, non-overlapping pulse intervals in seconds.
    pub intervals: Vec<TriggerInterval>,
}

/// Lay out a fresh pulse train and render it.
pub fn generate<R: Rng>(
    num_samples: usize,
    sample_rate: u32,
    params: &TriggerParams,
    rng: &mut R,
) -> Result<TriggerTrain, LayoutError> {
    let intervals = schedule::layout_intervals(num_samples, sample_rate, params, rng)?;
    let signal = signal::render(num_samples, sample_rate, params.amplitude, &intervals);
    Ok(TriggerTrain { signal, intervals })
}

/// Reconstruct a pulse train from a previously saved position file.
///
/// A missing file is an error; there is deliberately no fallback generation,
/// since silently regenerating would desynchronize already-recorded data.
pub fn replay_from_file(
    path: &Path,
    num_samples: usize,
    sample_rate: u32,
    amplitude: f32,
) -> Result<TriggerTrain, PositionFileError> {
    let intervals = positions::read_positions(path)?;
    let signal = signal::render(num_samples, sample_rate, amplitude, &intervals);
    Ok(TriggerTrain { signal, intervals })
}
