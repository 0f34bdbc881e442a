//! Filesystem locations for stimprep's own files.
//!
//! Stimulus media lives wherever the configured media root points; only the
//! config file and run logs go under a per-user `.stimprep` directory. The
//! anchor can be moved with `STIMPREP_CONFIG_HOME` for portable setups.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Directory created under the OS config root (or the override).
pub const APP_DIR_NAME: &str = ".stimprep";
/// Environment override for where the `.stimprep` directory is anchored.
pub const CONFIG_HOME_ENV: &str = "STIMPREP_CONFIG_HOME";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create the application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.stimprep` root, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Run logs get their own subdirectory so log pruning never has to reason
/// about the config file sitting next to them.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn base_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Some(path) = test_override::get() {
        return Some(path);
    }
    if let Ok(path) = std::env::var(CONFIG_HOME_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod test_override {
    use std::path::PathBuf;
    use std::sync::Mutex;

    static OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

    pub(super) fn get() -> Option<PathBuf> {
        OVERRIDE.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(value: Option<PathBuf>) {
        let mut guard = OVERRIDE.lock().unwrap_or_else(|err| err.into_inner());
        *guard = value;
    }

    /// RAII override of the config base directory for crate-internal tests.
    pub(crate) struct ConfigBaseGuard;

    impl ConfigBaseGuard {
        pub(crate) fn set(path: PathBuf) -> Self {
            set(Some(path));
            Self
        }
    }

    impl Drop for ConfigBaseGuard {
        fn drop(&mut self) {
            set(None);
        }
    }
}

#[cfg(test)]
pub(crate) use test_override::ConfigBaseGuard;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn uses_override_for_root_dir() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
        let root = app_root_dir().unwrap();
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        assert!(root.is_dir());
    }

    #[test]
    fn logs_dir_nests_under_root() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
        let logs = logs_dir().unwrap();
        assert_eq!(logs, base.path().join(APP_DIR_NAME).join("logs"));
        assert!(logs.is_dir());
    }
}
