use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "Invalid input path {path:?}: expected a .pdb file or a directory containing .pdb files"
    )]
    InvalidInput { path: PathBuf },

    #[error("Failed to launch {tool} command '{command}': {source}")]
    ToolLaunch {
        tool: &'static str,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Repair tool failed for {path:?} ({status}): {stderr}")]
    RepairFailed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Feature tool failed for {path:?} ({status}): {stderr}")]
    FeatureToolFailed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Feature tool output for {path:?} is not a flat numeric JSON object: {source}")]
    FeatureToolOutput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse structure {path:?}: {details}")]
    Structure { path: PathBuf, details: String },

    #[error("Chain '{chain_id}' not found in {path:?}")]
    ChainNotFound { chain_id: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
