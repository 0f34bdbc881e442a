//! Pulse placement: fixed start markers, random spacing, forced final pulse.

use rand::Rng;
use thiserror::Error;

use super::{TriggerInterval, TriggerParams, quantize};

/// Keep the tail of the signal pulse-free so the random run never collides
/// with the forced final pulse.
const END_GUARD_SECONDS: f64 = 1.0;

/// Errors that can occur while laying out a pulse train.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The pulse width rounds to zero samples at this rate.
    #[error("Pulse duration {pulse_duration}s is below one sample at {sample_rate} Hz")]
    ZeroPulseWidth {
        pulse_duration: f64,
        sample_rate: u32,
    },
    /// The signal cannot contain even the forced final pulse.
    #[error("Signal of {num_samples} samples is shorter than one pulse ({pulse_samples} samples)")]
    SignalTooShort {
        num_samples: usize,
        pulse_samples: usize,
    },
    /// A fixed start marker does not fit inside the signal.
    #[error("Start marker at {position}s falls outside a {num_samples}-sample signal")]
    MarkerOutOfRange { position: f64, num_samples: usize },
    /// Fixed start markers must be ascending and non-overlapping.
    #[error("Start marker at {position}s overlaps the previous marker")]
    MarkerOverlap { position: f64 },
}

/// Lay out the ordered, non-overlapping pulse intervals for a signal of
/// `num_samples` samples at `sample_rate` Hz.
///
/// Start markers are placed first, in order. The cursor then advances by
/// `uniform(min_spacing, max_spacing) + pulse_duration` per step, placing a
/// pulse at each stop until the cursor falls within one second of the signal
/// end. A final pulse is forced over the last pulse-width samples regardless
/// of the spacing to its predecessor.
pub fn layout_intervals<R: Rng>(
    num_samples: usize,
    sample_rate: u32,
    params: &TriggerParams,
    rng: &mut R,
) -> Result<Vec<TriggerInterval>, LayoutError> {
    let pulse_samples = pulse_width_samples(params.pulse_duration, sample_rate)?;
    if num_samples < pulse_samples {
        return Err(LayoutError::SignalTooShort {
            num_samples,
            pulse_samples,
        });
    }

    let rate = f64::from(sample_rate);
    let total_seconds = num_samples as f64 / rate;
    let mut intervals: Vec<TriggerInterval> = Vec::new();

    for &position in &params.initial_positions {
        let interval = TriggerInterval::at(position, params.pulse_duration);
        let (_, end) = interval.sample_span(sample_rate);
        if position < 0.0 || end > num_samples {
            return Err(LayoutError::MarkerOutOfRange {
                position,
                num_samples,
            });
        }
        if let Some(previous) = intervals.last()
            && interval.onset < previous.offset
        {
            return Err(LayoutError::MarkerOverlap { position });
        }
        intervals.push(interval);
    }

    let final_interval = TriggerInterval {
        onset: quantize((num_samples - pulse_samples) as f64 / rate),
        offset: quantize(num_samples as f64 / rate),
    };

    let mut cursor = params
        .initial_positions
        .last()
        .copied()
        .unwrap_or_default();
    loop {
        cursor += draw_spacing(params, rng) + params.pulse_duration;
        if cursor >= total_seconds - END_GUARD_SECONDS {
            break;
        }
        let interval = TriggerInterval::at(cursor, params.pulse_duration);
        // Degenerate parameter sets could still reach the forced pulse.
        if interval.offset > final_interval.onset {
            break;
        }
        intervals.push(interval);
    }

    intervals.push(final_interval);
    Ok(intervals)
}

/// Pulse width in whole samples; at least one.
pub fn pulse_width_samples(pulse_duration: f64, sample_rate: u32) -> Result<usize, LayoutError> {
    let samples = (pulse_duration * f64::from(sample_rate)).round() as usize;
    if samples == 0 {
        return Err(LayoutError::ZeroPulseWidth {
            pulse_duration,
            sample_rate,
        });
    }
    Ok(samples)
}

fn draw_spacing<R: Rng>(params: &TriggerParams, rng: &mut R) -> f64 {
    if params.max_spacing > params.min_spacing {
        rng.random_range(params.min_spacing..params.max_spacing)
    } else {
        params.min_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const RATE: u32 = 44_100;

    fn params() -> TriggerParams {
        TriggerParams {
            amplitude: 1.0,
            pulse_duration: 0.002,
            min_spacing: 0.5,
            max_spacing: 1.5,
            initial_positions: vec![3.0, 3.2, 3.4],
        }
    }

    #[test]
    fn start_markers_land_on_expected_samples() {
        let num_samples = 10 * RATE as usize;
        let mut rng = StdRng::seed_from_u64(1);
        let intervals = layout_intervals(num_samples, RATE, &params(), &mut rng).unwrap();

        let spans: Vec<_> = intervals
            .iter()
            .take(3)
            .map(|interval| interval.sample_span(RATE))
            .collect();
        assert_eq!(
            spans,
            vec![
                (132_300, 132_388),
                (141_120, 141_208),
                (149_940, 150_028)
            ]
        );
    }

    #[test]
    fn final_pulse_covers_the_last_pulse_width() {
        let num_samples = 10 * RATE as usize;
        let mut rng = StdRng::seed_from_u64(2);
        let intervals = layout_intervals(num_samples, RATE, &params(), &mut rng).unwrap();

        let last = intervals.last().unwrap();
        assert_eq!(last.sample_span(RATE), (num_samples - 88, num_samples));
    }

    #[test]
    fn intervals_are_ascending_and_disjoint() {
        let num_samples = 30 * RATE as usize;
        let mut rng = StdRng::seed_from_u64(3);
        let intervals = layout_intervals(num_samples, RATE, &params(), &mut rng).unwrap();

        assert!(intervals.len() > 4, "expected random pulses beyond markers");
        for pair in intervals.windows(2) {
            assert!(pair[0].onset < pair[1].onset);
            assert!(pair[0].offset <= pair[1].onset);
        }
    }

    #[test]
    fn random_run_stops_one_second_before_the_end() {
        let num_samples = 20 * RATE as usize;
        let mut rng = StdRng::seed_from_u64(4);
        let intervals = layout_intervals(num_samples, RATE, &params(), &mut rng).unwrap();

        let total_seconds = num_samples as f64 / f64::from(RATE);
        for interval in &intervals[..intervals.len() - 1] {
            assert!(interval.onset < total_seconds - 1.0);
        }
    }

    #[test]
    fn rejects_markers_beyond_the_signal() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = layout_intervals(RATE as usize, RATE, &params(), &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::MarkerOutOfRange { .. }));
    }

    #[test]
    fn rejects_signals_shorter_than_one_pulse() {
        let mut rng = StdRng::seed_from_u64(6);
        let err = layout_intervals(10, RATE, &params(), &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::SignalTooShort { .. }));
    }

    #[test]
    fn rejects_overlapping_markers() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut overlapping = params();
        overlapping.initial_positions = vec![3.0, 3.001];
        let err =
            layout_intervals(10 * RATE as usize, RATE, &overlapping, &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::MarkerOverlap { .. }));
    }

    #[test]
    fn zero_width_pulse_is_rejected() {
        let err = pulse_width_samples(0.000_001, 8_000).unwrap_err();
        assert!(matches!(err, LayoutError::ZeroPulseWidth { .. }));
    }

    #[test]
    fn works_without_start_markers() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut bare = params();
        bare.initial_positions.clear();
        let intervals = layout_intervals(5 * RATE as usize, RATE, &bare, &mut rng).unwrap();
        assert!(!intervals.is_empty());
        let last = intervals.last().unwrap();
        assert_eq!(
            last.sample_span(RATE),
            (5 * RATE as usize - 88, 5 * RATE as usize)
        );
    }
}
