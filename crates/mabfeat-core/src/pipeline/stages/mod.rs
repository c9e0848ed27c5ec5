//! The three external-collaborator seams of the pipeline.
//!
//! Each stage is a trait so the real child-process invocations can be
//! replaced by deterministic doubles in tests. Production implementations
//! spawn the commands named in the pipeline configuration.

mod annotate;
mod features;
mod repair;

pub use annotate::{Annotate, CommandAnnotator};
pub use features::{CHARGE_ASYMMETRY_KEY, DescriptorSet, Featurize};
pub use repair::{CommandRepairer, Repair};

use crate::pipeline::config::PipelineConfig;
use std::process::Command;

/// Production stage set built once from a pipeline configuration and shared
/// by every per-file task.
pub struct Stages {
    pub repairer: Box<dyn Repair>,
    pub annotator: Box<dyn Annotate>,
    pub featurizer: Box<dyn Featurize>,
}

impl Stages {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            repairer: Box::new(CommandRepairer::new(&config.repair)),
            annotator: Box::new(CommandAnnotator::new(&config.annotator)),
            featurizer: Box::new(DescriptorSet::new(&config.features, config.ph)),
        }
    }

    pub fn new(
        repairer: Box<dyn Repair>,
        annotator: Box<dyn Annotate>,
        featurizer: Box<dyn Featurize>,
    ) -> Self {
        Self {
            repairer,
            annotator,
            featurizer,
        }
    }
}

/// Builds a [`Command`] from a configured argv, where the first element is
/// the executable and the rest are leading arguments. Configurations are
/// validated to be non-empty before they reach this point.
pub(crate) fn build_command(argv: &[String]) -> Command {
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command
}
