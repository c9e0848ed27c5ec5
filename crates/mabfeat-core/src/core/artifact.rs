use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A uniquely named on-disk file owned by a single repeat of the pipeline.
///
/// The file is removed (best effort) when the guard is dropped, so every exit
/// path of a repeat releases its scratch files: success, a stage error, or an
/// absent annotator result. A file that is already gone is not an error.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Allocates a fresh empty file with the given suffix in the system
    /// temporary directory.
    pub fn allocate(suffix: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("mabfeat-")
            .suffix(suffix)
            .tempfile()?;
        // Disarm tempfile's own cleanup; deletion is this guard's job.
        let path = file.into_temp_path().keep()?;
        Ok(Self { path })
    }

    /// Takes ownership of an existing (or about-to-be-written) path so it is
    /// cleaned up together with allocated artifacts.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove temporary artifact {:?}: {}",
                self.path, e
            ),
        }
    }
}
