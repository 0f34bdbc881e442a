//! Rendering intervals into a sample-indexed pulse signal.

use super::TriggerInterval;

/// Render intervals into a length-`num_samples` signal: zero outside pulses,
/// `amplitude` inside. Both fresh generation and replay go through this
/// function, which is what makes the position-file round trip exact.
pub fn render(
    num_samples: usize,
    sample_rate: u32,
    amplitude: f32,
    intervals: &[TriggerInterval],
) -> Vec<f32> {
    let mut signal = vec![0.0; num_samples];
    for interval in intervals {
        let (start, end) = interval.sample_span(sample_rate);
        let start = start.min(num_samples);
        let end = end.min(num_samples);
        signal[start..end].fill(amplitude);
    }
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_exactly_the_sample_span() {
        let intervals = vec![TriggerInterval {
            onset: 3.0,
            offset: 3.002,
        }];
        let signal = render(10 * 44_100, 44_100, 1.0, &intervals);

        assert!(signal[..132_300].iter().all(|&s| s == 0.0));
        assert!(signal[132_300..132_388].iter().all(|&s| s == 1.0));
        assert!(signal[132_388..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn clamps_intervals_past_the_signal_end() {
        let intervals = vec![TriggerInterval {
            onset: 0.9,
            offset: 1.5,
        }];
        let signal = render(44_100, 44_100, 0.5, &intervals);
        assert_eq!(signal[44_099], 0.5);
        assert_eq!(signal.len(), 44_100);
    }

    #[test]
    fn amplitude_is_respected() {
        let intervals = vec![TriggerInterval {
            onset: 0.0,
            offset: 0.001,
        }];
        let signal = render(100, 8_000, 0.25, &intervals);
        assert_eq!(signal[0], 0.25);
    }
}
