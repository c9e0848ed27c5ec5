use crate::core::artifact::TempArtifact;
use crate::pipeline::config::{AnnotatorConfig, AnnotatorOutput};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Runs the external antibody-numbering annotator on a repaired structure.
///
/// Annotation failure is an expected outcome, not an error: a non-zero exit,
/// a spawn failure, or an unwritable log all degrade to `None`, and the
/// caller skips the repeat. The only success criterion is the child's exit
/// status; the output file's contents are not inspected.
pub trait Annotate: Send + Sync {
    fn annotate(&self, input: &Path) -> Option<TempArtifact>;
}

/// [`Annotate`] implementation that spawns the configured command as
/// `<command...> -i <input> -o <output>` and appends a per-invocation record
/// to the annotator log.
pub struct CommandAnnotator {
    command: Vec<String>,
    log_path: PathBuf,
    output: AnnotatorOutput,
    log_stdout: bool,
}

impl CommandAnnotator {
    pub fn new(config: &AnnotatorConfig) -> Self {
        Self {
            command: config.command.clone(),
            log_path: config.log_path.clone(),
            output: config.output,
            log_stdout: config.log_stdout,
        }
    }

    fn allocate_output(&self, input: &Path) -> std::io::Result<TempArtifact> {
        match self.output {
            AnnotatorOutput::Temporary => TempArtifact::allocate("_annotated.pdb"),
            AnnotatorOutput::Derived => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let derived = input.with_file_name(format!("{}_annotated.pdb", stem));
                Ok(TempArtifact::adopt(derived))
            }
        }
    }

    fn append_log(&self, input: &Path, stdout: &[u8], stderr: &[u8]) -> std::io::Result<()> {
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(
            log,
            "[{}] Processing {}:",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            input.display()
        )?;
        if self.log_stdout && !stdout.is_empty() {
            log.write_all(stdout)?;
        }
        if !stderr.is_empty() {
            writeln!(log, "Errors:")?;
            log.write_all(stderr)?;
        }
        Ok(())
    }
}

impl Annotate for CommandAnnotator {
    fn annotate(&self, input: &Path) -> Option<TempArtifact> {
        let artifact = match self.allocate_output(input) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("Failed to allocate annotator output for {:?}: {}", input, e);
                return None;
            }
        };

        let mut command = super::build_command(&self.command);
        command.arg("-i").arg(input).arg("-o").arg(artifact.path());
        debug!("Running annotator command: {:?}", command);

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                error!("Failed to run annotator on {:?}: {}", input, e);
                return None;
            }
        };

        if let Err(e) = self.append_log(input, &output.stdout, &output.stderr) {
            error!("Failed to write annotator log {:?}: {}", self.log_path, e);
        }
        if !output.stderr.is_empty() {
            error!(
                "Annotator reported errors for {:?}: {}",
                input,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        if output.status.success() {
            Some(artifact)
        } else {
            None
        }
    }
}
