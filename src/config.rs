//! Configuration for the stimulus preparation utilities.
//!
//! All operator-environment paths (media root, priority list, genre mapping)
//! live in a TOML file rather than in code. The file is resolved under the
//! per-user application directory unless an explicit path is given.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{app_dirs, trigger::TriggerParams};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No suitable config directory could be resolved.
    #[error("No suitable config directory available")]
    NoConfigDir,
    /// Failed to create a directory along the config path.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read the config file.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the config file as TOML.
    #[error("Failed to parse config {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize the configuration to TOML.
    #[error("Failed to serialize config {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// The configuration does not name a media root.
    #[error("Config has no media_root; set one in {path}")]
    MissingMediaRoot { path: PathBuf },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the media tree (`Add_Triggers`, `Create_Playlists`, `images`).
    pub media_root: PathBuf,
    pub playlist: PlaylistSettings,
    pub trigger: TriggerSettings,
    /// Mapping from genre tag to destination folder under `Create_Playlists/media`.
    pub genres: BTreeMap<String, String>,
}

/// Settings for the playlist manifest builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// File extensions considered media, with leading dot.
    pub extensions: Vec<String>,
    /// CSV file with a `filename` column listing priority stimuli.
    pub priority_list: Option<PathBuf>,
    /// Output filename for the manifest JSON.
    pub manifest_name: String,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            extensions: vec![".wav".into(), ".mp3".into(), ".mp4".into()],
            priority_list: None,
            manifest_name: "metadata.json".into(),
        }
    }
}

/// Settings for trigger generation and the assembly pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Sample rate every stimulus is resampled to, in Hz.
    pub sample_rate: u32,
    /// Seconds of silence prepended to each stimulus.
    pub silence_duration: f64,
    /// Pulse amplitude, 0 to 1.
    pub amplitude: f32,
    /// Pulse width in seconds.
    pub pulse_duration: f64,
    /// Minimum random spacing between pulses, in seconds.
    pub min_spacing: f64,
    /// Maximum random spacing between pulses, in seconds.
    pub max_spacing: f64,
    /// Start-marker offsets relative to the end of the silence lead-in.
    pub start_marker_offsets: Vec<f64>,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            silence_duration: 3.0,
            amplitude: 1.0,
            pulse_duration: 0.002,
            min_spacing: 0.5,
            max_spacing: 1.5,
            start_marker_offsets: vec![0.0, 0.2, 0.4],
        }
    }
}

impl TriggerSettings {
    /// Build the parameter set for the trigger generator.
    ///
    /// Start markers are anchored at the end of the silence lead-in, so the
    /// absolute initial positions depend on `silence_duration`.
    pub fn params(&self) -> TriggerParams {
        TriggerParams {
            amplitude: self.amplitude,
            pulse_duration: self.pulse_duration,
            min_spacing: self.min_spacing,
            max_spacing: self.max_spacing,
            initial_positions: self
                .start_marker_offsets
                .iter()
                .map(|offset| self.silence_duration + offset)
                .collect(),
        }
    }

    fn normalized(mut self) -> Self {
        if self.min_spacing > self.max_spacing {
            std::mem::swap(&mut self.min_spacing, &mut self.max_spacing);
        }
        self.amplitude = self.amplitude.clamp(0.0, 1.0);
        self
    }
}

impl AppConfig {
    /// Apply value clamps after deserialization.
    pub fn normalized(mut self) -> Self {
        self.trigger = self.trigger.normalized();
        self
    }

    /// The genre mapping used by default when none is configured.
    pub fn default_genres() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Audiobooks".into(), "Audiobooks".into()),
            ("Musique".into(), "Musique".into()),
            ("Podcast".into(), "Podcasts".into()),
            ("Vidéos".into(), "Vidéos".into()),
        ])
    }

    /// View the configured media root as a [`MediaTree`].
    pub fn media_tree(&self) -> MediaTree {
        MediaTree::new(self.media_root.clone())
    }
}

/// Directory paths for one stimulus-assembly run.
#[derive(Debug, Clone)]
pub struct StimulusPaths {
    /// Source media without triggers.
    pub source_dir: PathBuf,
    /// Where processed stimuli with triggers are written.
    pub output_dir: PathBuf,
    /// Where trigger-position text files are written.
    pub trigger_dir: PathBuf,
}

/// Fixed directory layout under the configured media root.
#[derive(Debug, Clone)]
pub struct MediaTree {
    root: PathBuf,
}

impl MediaTree {
    /// Wrap a media root directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths used by the trigger pipeline.
    pub fn stimulus_paths(&self) -> StimulusPaths {
        let base = self.root.join("Add_Triggers");
        StimulusPaths {
            source_dir: base.join("original_stimuli"),
            output_dir: base.join("stimuli_with_triggers"),
            trigger_dir: base.join("triggers"),
        }
    }

    pub fn album_covers(&self) -> PathBuf {
        self.root.join("images").join("Album covers")
    }

    pub fn video_thumbnails(&self) -> PathBuf {
        self.root.join("images").join("Video thumbnails")
    }

    /// Category folders scanned by the manifest builder live here.
    pub fn playlist_media(&self) -> PathBuf {
        self.root.join("Create_Playlists").join("media")
    }

    pub fn playlist_metadata(&self) -> PathBuf {
        self.root.join("Create_Playlists").join("metadata")
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default location, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if path.exists() {
        load_from(&path)
    } else {
        Ok(AppConfig {
            genres: AppConfig::default_genres(),
            ..AppConfig::default()
        })
    }
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    toml::from_str::<AppConfig>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppConfig::normalized)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Require a non-empty media root, reporting where to set one.
pub fn require_media_root(config: &AppConfig) -> Result<(), ConfigError> {
    if config.media_root.as_os_str().is_empty() {
        let path = config_path().unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
        return Err(ConfigError::MissingMediaRoot { path });
    }
    Ok(())
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}
