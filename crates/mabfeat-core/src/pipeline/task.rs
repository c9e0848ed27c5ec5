use super::record::{FeatureMap, FileRecord};
use super::stages::{Annotate, Featurize, Repair};
use crate::pipeline::error::PipelineError;
use std::path::Path;
use tracing::{error, info, instrument};

/// One parallel unit of work: the repair → annotate → featurize pipeline for
/// a single structure file, run `repeats` times.
///
/// Repeats are independent. Any stage error (or an absent annotator result)
/// skips the repeat after logging; the remaining repeats and all other files
/// are unaffected. Scratch files of a repeat are owned by drop guards, so
/// they are released on every exit path.
pub struct FileTask<'a> {
    repairer: &'a dyn Repair,
    annotator: &'a dyn Annotate,
    featurizer: &'a dyn Featurize,
    repeats: usize,
    ph: f64,
}

impl<'a> FileTask<'a> {
    pub fn new(
        repairer: &'a dyn Repair,
        annotator: &'a dyn Annotate,
        featurizer: &'a dyn Featurize,
        repeats: usize,
        ph: f64,
    ) -> Self {
        Self {
            repairer,
            annotator,
            featurizer,
            repeats,
            ph,
        }
    }

    #[instrument(skip_all, name = "file_task")]
    pub fn process(&self, path: &Path) -> FileRecord {
        let mut features = Vec::new();

        for repeat in 1..=self.repeats {
            match self.run_repeat(path) {
                Ok(Some(map)) => features.push(map),
                Ok(None) => error!(
                    "Skipping feature calculation for {:?} (repeat {}): annotator produced no output",
                    path, repeat
                ),
                Err(e) => error!("Error processing {:?} (repeat {}): {}", path, repeat, e),
            }
        }

        info!(
            file = %path.display(),
            kept = features.len(),
            repeats = self.repeats,
            "File task complete."
        );
        FileRecord {
            path: path.to_path_buf(),
            features,
        }
    }

    fn run_repeat(&self, path: &Path) -> Result<Option<FeatureMap>, PipelineError> {
        let repaired = self.repairer.repair(path, self.ph)?;
        let Some(annotated) = self.annotator.annotate(repaired.path()) else {
            return Ok(None);
        };
        let features = self.featurizer.featurize(annotated.path())?;
        Ok(Some(features))
    }
}
