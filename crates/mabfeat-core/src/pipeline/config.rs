use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Output-path strategy for the annotator stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotatorOutput {
    /// Allocate a fresh temporary file for each invocation.
    #[default]
    Temporary,
    /// Derive a sibling filename from the repaired input file.
    Derived,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatorConfig {
    pub command: Vec<String>,
    pub log_path: PathBuf,
    pub output: AnnotatorOutput,
    pub log_stdout: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub command: Vec<String>,
    pub heavy_chain: String,
    pub light_chain: String,
}

/// Immutable configuration snapshot shared by every parallel task.
///
/// Built once by the orchestrating layer and passed down by reference; tasks
/// never re-read configuration from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub ph: f64,
    pub repeats: usize,
    pub repair: RepairConfig,
    pub annotator: AnnotatorConfig,
    pub features: FeatureConfig,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    ph: Option<f64>,
    repeats: Option<usize>,
    repair_command: Option<Vec<String>>,
    annotator_command: Option<Vec<String>>,
    annotator_log: Option<PathBuf>,
    annotator_output: Option<AnnotatorOutput>,
    annotator_log_stdout: bool,
    feature_command: Option<Vec<String>>,
    heavy_chain: Option<String>,
    light_chain: Option<String>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }
    pub fn repeats(mut self, repeats: usize) -> Self {
        self.repeats = Some(repeats);
        self
    }
    pub fn repair_command(mut self, command: Vec<String>) -> Self {
        self.repair_command = Some(command);
        self
    }
    pub fn annotator_command(mut self, command: Vec<String>) -> Self {
        self.annotator_command = Some(command);
        self
    }
    pub fn annotator_log(mut self, path: PathBuf) -> Self {
        self.annotator_log = Some(path);
        self
    }
    pub fn annotator_output(mut self, output: AnnotatorOutput) -> Self {
        self.annotator_output = Some(output);
        self
    }
    pub fn annotator_log_stdout(mut self, log_stdout: bool) -> Self {
        self.annotator_log_stdout = log_stdout;
        self
    }
    pub fn feature_command(mut self, command: Vec<String>) -> Self {
        self.feature_command = Some(command);
        self
    }
    pub fn heavy_chain(mut self, chain_id: String) -> Self {
        self.heavy_chain = Some(chain_id);
        self
    }
    pub fn light_chain(mut self, chain_id: String) -> Self {
        self.light_chain = Some(chain_id);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let ph = self.ph.unwrap_or(7.0);
        if !(0.0..=14.0).contains(&ph) {
            return Err(ConfigError::InvalidParameter {
                parameter: "ph",
                reason: format!("{} is outside the 0-14 range", ph),
            });
        }

        let repeats = self.repeats.unwrap_or(1);
        if repeats == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "repeats",
                reason: "must be at least 1".to_string(),
            });
        }

        let repair_command = Self::non_empty(
            "repair_command",
            self.repair_command
                .ok_or(ConfigError::MissingParameter("repair_command"))?,
        )?;
        let annotator_command = Self::non_empty(
            "annotator_command",
            self.annotator_command
                .ok_or(ConfigError::MissingParameter("annotator_command"))?,
        )?;
        let feature_command = Self::non_empty(
            "feature_command",
            self.feature_command
                .ok_or(ConfigError::MissingParameter("feature_command"))?,
        )?;

        Ok(PipelineConfig {
            ph,
            repeats,
            repair: RepairConfig {
                command: repair_command,
            },
            annotator: AnnotatorConfig {
                command: annotator_command,
                log_path: self
                    .annotator_log
                    .unwrap_or_else(|| PathBuf::from("annotator.log")),
                output: self.annotator_output.unwrap_or_default(),
                log_stdout: self.annotator_log_stdout,
            },
            features: FeatureConfig {
                command: feature_command,
                heavy_chain: self.heavy_chain.unwrap_or_else(|| "H".to_string()),
                light_chain: self.light_chain.unwrap_or_else(|| "L".to_string()),
            },
        })
    }

    fn non_empty(
        parameter: &'static str,
        command: Vec<String>,
    ) -> Result<Vec<String>, ConfigError> {
        if command.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter,
                reason: "command must name an executable".to_string(),
            });
        }
        Ok(command)
    }
}
