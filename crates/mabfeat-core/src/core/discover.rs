use crate::pipeline::error::PipelineError;
use std::path::{Path, PathBuf};

/// File extension recognized as a structure file.
pub const STRUCTURE_EXTENSION: &str = "pdb";

/// Resolves an input path to the list of structure files to process.
///
/// A directory yields its immediate children with the structure-file
/// extension, in filesystem enumeration order (no recursion); a single
/// structure file yields a one-element list. Anything else is an
/// [`PipelineError::InvalidInput`]. An empty directory is a valid, empty
/// batch.
pub fn resolve_input(input: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if input.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() && is_structure_file(&path) {
                files.push(path);
            }
        }
        Ok(files)
    } else if input.is_file() && is_structure_file(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(PipelineError::InvalidInput {
            path: input.to_path_buf(),
        })
    }
}

fn is_structure_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == STRUCTURE_EXTENSION)
}
