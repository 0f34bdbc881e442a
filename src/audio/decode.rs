//! Symphonia-based decoding to interleaved `f32` samples.

use std::{fs::File, path::{Path, PathBuf}};

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use thiserror::Error;

/// Raw decoded audio in interleaved `f32` samples.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Errors that can occur while decoding a media file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unrecognized media format for {path}: {source}")]
    Probe { path: PathBuf, source: Error },
    #[error("No decodable audio track in {path}")]
    NoAudioTrack { path: PathBuf },
    #[error("Missing sample rate or channel count for {path}")]
    MissingSignalSpec { path: PathBuf },
    #[error("No decoder available for {path}: {source}")]
    Decoder { path: PathBuf, source: Error },
    #[error("Failed reading packets from {path}: {source}")]
    PacketRead { path: PathBuf, source: Error },
    #[error("Decoded zero samples from {path}")]
    Empty { path: PathBuf },
}

/// Decode the audio track of a media file into interleaved `f32` samples.
///
/// For video containers the first track with a usable audio codec is chosen;
/// unsupported video tracks are skipped.
pub fn decode_audio(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|track| {
            track.codec_params.codec != CODEC_TYPE_NULL
                && track.codec_params.sample_rate.is_some()
        })
        .ok_or_else(|| DecodeError::NoAudioTrack {
            path: path.to_path_buf(),
        })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::MissingSignalSpec {
            path: path.to_path_buf(),
        })?;
    let channels = codec_params
        .channels
        .ok_or_else(|| DecodeError::MissingSignalSpec {
            path: path.to_path_buf(),
        })?
        .count() as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::Decoder {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(source) => {
                return Err(DecodeError::PacketRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            // Skip corrupt packets; the stream usually recovers.
            Err(Error::DecodeError(_)) => continue,
            Err(source) => {
                return Err(DecodeError::PacketRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_test_wav(path: &Path, channels: u16, frames: usize) {
        let spec = WavSpec {
            channels,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for index in 0..frames * channels as usize {
            writer.write_sample((index % 128) as i16 * 256).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_a_wav_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path, 2, 1_000);

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.samples.len(), 2_000);
    }

    #[test]
    fn missing_file_reports_open_error() {
        let dir = tempdir().unwrap();
        let err = decode_audio(&dir.path().join("absent.wav")).unwrap_err();
        assert!(matches!(err, DecodeError::Open { .. }));
    }
}
