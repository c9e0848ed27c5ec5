use crate::core::artifact::TempArtifact;
use crate::pipeline::config::RepairConfig;
use crate::pipeline::error::PipelineError;
use std::path::Path;
use tracing::debug;

/// Repairs a structure file by adding missing hydrogens at a given pH.
///
/// A repaired copy is written to a freshly allocated path; the original file
/// is never touched. Repair failures are errors and propagate to the
/// per-repeat handler (unlike annotation, which signals absence instead).
pub trait Repair: Send + Sync {
    fn repair(&self, input: &Path, ph: f64) -> Result<TempArtifact, PipelineError>;
}

/// [`Repair`] implementation that shells out to a PDBFixer-style command.
///
/// The command is invoked as
/// `<command...> <input> --output=<path> --add-atoms=hydrogen --ph=<ph>` and
/// must exit zero after writing the repaired structure to `<path>`.
pub struct CommandRepairer {
    command: Vec<String>,
}

impl CommandRepairer {
    pub fn new(config: &RepairConfig) -> Self {
        Self {
            command: config.command.clone(),
        }
    }
}

impl Repair for CommandRepairer {
    fn repair(&self, input: &Path, ph: f64) -> Result<TempArtifact, PipelineError> {
        let artifact = TempArtifact::allocate(".pdb")?;

        let mut command = super::build_command(&self.command);
        command
            .arg(input)
            .arg(format!("--output={}", artifact.path().display()))
            .arg("--add-atoms=hydrogen")
            .arg(format!("--ph={}", ph));
        debug!("Running repair command: {:?}", command);

        let output = command
            .output()
            .map_err(|source| PipelineError::ToolLaunch {
                tool: "repair",
                command: self.command.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(PipelineError::RepairFailed {
                path: input.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(artifact)
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sh_repairer(dir: &Path, body: &str) -> CommandRepairer {
        let script = dir.join("repair.sh");
        fs::write(&script, body).unwrap();
        CommandRepairer::new(&RepairConfig {
            command: vec![
                "/bin/sh".to_string(),
                script.to_str().unwrap().to_string(),
            ],
        })
    }

    #[test]
    fn successful_repair_writes_a_temporary_copy() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, b"ATOM\nEND\n").unwrap();

        let repairer = sh_repairer(
            dir.path(),
            "out=\"\"\nfor a in \"$@\"; do\n  case \"$a\" in --output=*) out=\"${a#--output=}\";; esac\ndone\ncp \"$1\" \"$out\"\n",
        );

        let artifact = repairer.repair(&input, 7.0).unwrap();
        assert_eq!(fs::read(artifact.path()).unwrap(), b"ATOM\nEND\n");
        assert_ne!(artifact.path(), input);

        let path = artifact.path().to_path_buf();
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn non_zero_exit_is_a_repair_error_with_stderr() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, b"END\n").unwrap();

        let repairer = sh_repairer(dir.path(), "echo 'no template for residue' >&2\nexit 3\n");

        let result = repairer.repair(&input, 7.0);
        match result {
            Err(PipelineError::RepairFailed { path, stderr, .. }) => {
                assert_eq!(path, input);
                assert!(stderr.contains("no template"));
            }
            other => panic!("expected RepairFailed, got {:?}", other),
        }
    }

    #[test]
    fn missing_executable_is_a_launch_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, b"END\n").unwrap();

        let repairer = CommandRepairer::new(&RepairConfig {
            command: vec!["/no/such/repair-binary".to_string()],
        });

        assert!(matches!(
            repairer.repair(&input, 7.0),
            Err(PipelineError::ToolLaunch { tool: "repair", .. })
        ));
    }
}
