//! Per-file stimulus assembly and the batch driver.
//!
//! Each source file under `Add_Triggers/original_stimuli` becomes a
//! trigger-carrying stimulus in `stimuli_with_triggers` plus a position
//! file in `triggers`. Audio goes out as stereo WAV (channel 1 audio,
//! channel 2 triggers); video is re-encoded with a black lead-in and the
//! prepared audio track.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::{self, AudioError, WavError};
use crate::config::{MediaTree, StimulusPaths, TriggerSettings};
use crate::tags::{self, StimulusTags, TagError};
use crate::trigger::{self, LayoutError, PositionFileError, TriggerTrain, position_file_path};
use crate::video::{self, EncodeSettings, VideoError};

/// Errors from processing a single stimulus file.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported media type: {path}")]
    Unsupported { path: PathBuf },
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Wav(#[from] WavError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Positions(#[from] PositionFileError),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Tags(#[from] TagError),
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to stage temporary audio: {0}")]
    TempAudio(std::io::Error),
}

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    /// Output already existed and `overwrite` was not requested.
    SkippedExisting,
}

/// Counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

fn read_source_tags(path: &Path) -> StimulusTags {
    match tags::read_metadata(path) {
        Ok(metadata) => metadata.tags,
        Err(err) => {
            warn!("Continuing with empty tags: {err}");
            StimulusTags::default()
        }
    }
}

/// Build the trigger channel for a padded signal, replaying a saved
/// position file when one exists so re-runs stay bit-identical.
fn trigger_channel<R: Rng>(
    num_samples: usize,
    settings: &TriggerSettings,
    trigger_path: &Path,
    overwrite: bool,
    rng: &mut R,
) -> Result<TriggerTrain, PipelineError> {
    if trigger_path.exists() && !overwrite {
        info!("Replaying trigger positions from {}", trigger_path.display());
        return Ok(trigger::replay_from_file(
            trigger_path,
            num_samples,
            settings.sample_rate,
            settings.amplitude,
        )?);
    }
    let train = trigger::generate(num_samples, settings.sample_rate, &settings.params(), rng)?;
    trigger::write_positions(trigger_path, &train.intervals)?;
    Ok(train)
}

fn process_audio<R: Rng>(
    source: &Path,
    stem: &str,
    paths: &StimulusPaths,
    settings: &TriggerSettings,
    overwrite: bool,
    rng: &mut R,
) -> Result<Outcome, PipelineError> {
    let output = paths.output_dir.join(format!("{stem}.wav"));
    if output.exists() && !overwrite {
        return Ok(Outcome::SkippedExisting);
    }

    let source_tags = read_source_tags(source);
    let mono = audio::load_mono(source, settings.sample_rate)?;
    let padded = audio::prepend_silence(mono, settings.sample_rate, settings.silence_duration);

    let trigger_path = position_file_path(&paths.trigger_dir, stem);
    let train = trigger_channel(padded.len(), settings, &trigger_path, overwrite, rng)?;

    audio::write_stereo_wav(&output, settings.sample_rate, &padded, &train.signal)?;
    tags::write_tags(&output, &source_tags)?;
    Ok(Outcome::Processed)
}

fn process_video<R: Rng>(
    source: &Path,
    stem: &str,
    paths: &StimulusPaths,
    thumbnails_dir: &Path,
    settings: &TriggerSettings,
    encode: &EncodeSettings,
    overwrite: bool,
    rng: &mut R,
) -> Result<Outcome, PipelineError> {
    let output = paths.output_dir.join(format!("{stem}.mp4"));
    if output.exists() && !overwrite {
        return Ok(Outcome::SkippedExisting);
    }

    let info = video::probe_video(source)?;
    let mono = audio::load_mono(source, settings.sample_rate)?;
    let padded = audio::prepend_silence(mono, settings.sample_rate, settings.silence_duration);

    let trigger_path = position_file_path(&paths.trigger_dir, stem);
    let train = trigger_channel(padded.len(), settings, &trigger_path, overwrite, rng)?;

    // ffmpeg reads the prepared track from disk, so stage it as a WAV.
    let temp = tempfile::Builder::new()
        .prefix("stimprep_")
        .suffix(".wav")
        .tempfile()
        .map_err(PipelineError::TempAudio)?;
    audio::write_stereo_wav(temp.path(), settings.sample_rate, &padded, &train.signal)?;

    video::assemble_with_lead_in(
        source,
        temp.path(),
        &output,
        settings.silence_duration,
        &info,
        encode,
    )?;
    video::copy_container_metadata(source, &output)?;

    let out_duration = info.duration_seconds + settings.silence_duration;
    let thumbnail = thumbnails_dir.join(format!("{stem}.jpg"));
    video::extract_frame(&output, &thumbnail, out_duration / 10.0, None)?;
    Ok(Outcome::Processed)
}

/// Process one source file into the output tree.
pub fn process_file<R: Rng>(
    source: &Path,
    paths: &StimulusPaths,
    thumbnails_dir: &Path,
    settings: &TriggerSettings,
    encode: &EncodeSettings,
    overwrite: bool,
    rng: &mut R,
) -> Result<Outcome, PipelineError> {
    let unsupported = || PipelineError::Unsupported {
        path: source.to_path_buf(),
    };
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(unsupported)?;
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(unsupported)?;

    match extension.as_str() {
        "wav" | "mp3" => process_audio(source, stem, paths, settings, overwrite, rng),
        "mp4" => process_video(
            source,
            stem,
            paths,
            thumbnails_dir,
            settings,
            encode,
            overwrite,
            rng,
        ),
        _ => Err(unsupported()),
    }
}

/// Process every file in `Add_Triggers/original_stimuli`.
///
/// Output directories are created up front. A failing file is logged and
/// counted; the batch continues with the rest.
pub fn run_batch<R: Rng>(
    tree: &MediaTree,
    settings: &TriggerSettings,
    encode: &EncodeSettings,
    overwrite: bool,
    rng: &mut R,
) -> Result<BatchSummary, PipelineError> {
    let paths = tree.stimulus_paths();
    let thumbnails_dir = tree.video_thumbnails();
    for dir in [&paths.output_dir, &paths.trigger_dir, &thumbnails_dir] {
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&paths.source_dir)
        .map_err(|source| PipelineError::Scan {
            path: paths.source_dir.clone(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    sources.sort();

    let mut summary = BatchSummary::default();
    for source in &sources {
        match process_file(
            source,
            &paths,
            &thumbnails_dir,
            settings,
            encode,
            overwrite,
            rng,
        ) {
            Ok(Outcome::Processed) => {
                info!("Processed {}", source.display());
                summary.processed += 1;
            }
            Ok(Outcome::SkippedExisting) => {
                debug!("Skipping {}, output already exists", source.display());
                summary.skipped += 1;
            }
            Err(err) => {
                warn!("Failed to process {}: {err}", source.display());
                summary.failed += 1;
            }
        }
    }

    if summary.processed == 0 {
        info!("No new media found in {}", paths.source_dir.display());
    }
    Ok(summary)
}
