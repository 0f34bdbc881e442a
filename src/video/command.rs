//! Synchronous invocation of the ffmpeg tool suite.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::Output;

use thiserror::Error;
use tracing::debug;

/// Errors from locating or running external video tools.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("{tool} not found on PATH; install ffmpeg to process video stimuli")]
    ToolMissing { tool: &'static str },
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Could not parse {tool} output: {detail}")]
    UnexpectedOutput {
        tool: &'static str,
        detail: String,
    },
    #[error("Failed to replace {path}: {source}")]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn locate(tool: &'static str) -> Result<PathBuf, VideoError> {
    which::which(tool).map_err(|_| VideoError::ToolMissing { tool })
}

/// Run a tool to completion and capture its output. A non-zero exit status
/// becomes an error carrying the tool's stderr.
pub(crate) fn run<I, S>(tool: &'static str, args: I) -> Result<Output, VideoError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = locate(tool)?;
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();
    debug!("Running {} with {:?}", program.display(), args);

    let output = std::process::Command::new(&program)
        .args(&args)
        .output()
        .map_err(|source| VideoError::Launch { tool, source })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(VideoError::Failed {
            tool,
            status: output.status,
            stderr,
        });
    }
    Ok(output)
}
