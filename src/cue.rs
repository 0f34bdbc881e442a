//! Short stereo cue tone marking acquisition-block boundaries.
//!
//! The file is mostly silence; channel 2 carries a single pulse shortly
//! after the start so the recorder can line up block transitions.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::audio::{WavError, write_stereo_wav};

/// Errors that can occur while writing a cue tone.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Wav(#[from] WavError),
}

/// Parameters of the pause cue tone.
#[derive(Debug, Clone, PartialEq)]
pub struct PauseTone {
    /// Total file duration in seconds.
    pub sound_duration: f64,
    pub sample_rate: u32,
    /// Pulse onset, seconds into the file.
    pub trigger_start: f64,
    /// Pulse width in seconds.
    pub trigger_duration: f64,
    /// Pulse amplitude, 0 to 1.
    pub amplitude: f32,
}

impl Default for PauseTone {
    fn default() -> Self {
        Self {
            sound_duration: 0.5,
            sample_rate: 44_100,
            trigger_start: 0.05,
            trigger_duration: 0.0035,
            amplitude: 1.0,
        }
    }
}

impl PauseTone {
    /// Conventional output filename, e.g. `trigger_pause_500ms.wav`.
    pub fn file_name(&self) -> String {
        format!("trigger_pause_{}ms.wav", (self.sound_duration * 1000.0) as u64)
    }

    /// Render the silent channel and the pulse channel.
    pub fn channels(&self) -> (Vec<f32>, Vec<f32>) {
        let rate = f64::from(self.sample_rate);
        let total_samples = (self.sound_duration * rate) as usize;
        let silent = vec![0.0; total_samples];

        let mut pulse = vec![0.0; total_samples];
        let start = ((self.trigger_start * rate) as usize).min(total_samples);
        let end = (start + (self.trigger_duration * rate) as usize).min(total_samples);
        pulse[start..end].fill(self.amplitude);
        (silent, pulse)
    }

    /// Write the cue tone into `dir`, creating it as needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, CueError> {
        std::fs::create_dir_all(dir).map_err(|source| CueError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());
        let (silent, pulse) = self.channels();
        write_stereo_wav(&path, self.sample_rate, &silent, &pulse)?;
        info!("Created {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pulse_sits_on_the_second_channel_only() {
        let tone = PauseTone::default();
        let (silent, pulse) = tone.channels();
        assert_eq!(silent.len(), 22_050);
        assert_eq!(pulse.len(), 22_050);
        assert!(silent.iter().all(|&s| s == 0.0));

        let start = 2_205;
        let width = 154;
        assert!(pulse[..start].iter().all(|&s| s == 0.0));
        assert!(pulse[start..start + width].iter().all(|&s| s == 1.0));
        assert!(pulse[start + width..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn file_name_encodes_the_duration() {
        assert_eq!(PauseTone::default().file_name(), "trigger_pause_500ms.wav");
        let long = PauseTone {
            sound_duration: 1.25,
            ..PauseTone::default()
        };
        assert_eq!(long.file_name(), "trigger_pause_1250ms.wav");
    }

    #[test]
    fn writes_a_stereo_wav() {
        let dir = tempdir().unwrap();
        let tone = PauseTone::default();
        let path = tone.write_to_dir(dir.path()).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.len(), 22_050 * 2);
    }
}
