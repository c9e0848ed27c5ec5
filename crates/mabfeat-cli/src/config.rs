use crate::cli::Cli;
use crate::error::{CliError, Result};
use mabfeat::pipeline::config::{AnnotatorOutput, PipelineConfig, PipelineConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DefaultsConfig {
    pub repair_command: Vec<String>,
    pub annotator_command: Vec<String>,
    pub annotator_log: PathBuf,
    pub feature_command: Vec<String>,
    pub heavy_chain: String,
    pub light_chain: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            repair_command: vec!["pdbfixer".to_string()],
            annotator_command: vec!["ImmunoPDB.py".to_string()],
            annotator_log: PathBuf::from("annotator.log"),
            feature_command: vec!["patch-features".to_string()],
            heavy_chain: "H".to_string(),
            light_chain: "L".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum PartialAnnotatorOutput {
    Temporary,
    Derived,
}

impl From<PartialAnnotatorOutput> for AnnotatorOutput {
    fn from(p: PartialAnnotatorOutput) -> Self {
        match p {
            PartialAnnotatorOutput::Temporary => AnnotatorOutput::Temporary,
            PartialAnnotatorOutput::Derived => AnnotatorOutput::Derived,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRepairConfig {
    command: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAnnotatorConfig {
    command: Option<Vec<String>>,
    log: Option<PathBuf>,
    output: Option<PartialAnnotatorOutput>,
    #[serde(rename = "log-stdout")]
    log_stdout: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFeatureConfig {
    command: Option<Vec<String>>,
    #[serde(rename = "heavy-chain")]
    heavy_chain: Option<String>,
    #[serde(rename = "light-chain")]
    light_chain: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialPipelineConfig {
    repair: Option<PartialRepairConfig>,
    annotator: Option<PartialAnnotatorConfig>,
    features: Option<PartialFeatureConfig>,
}

impl PartialPipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Merges the file-level values with the CLI arguments into the single
    /// immutable configuration snapshot shared by every task.
    pub fn merge_with_cli(mut self, cli: &Cli) -> Result<PipelineConfig> {
        let defaults = DefaultsConfig::default();
        let repair = self.repair.take().unwrap_or_default();
        let annotator = self.annotator.take().unwrap_or_default();
        let features = self.features.take().unwrap_or_default();

        PipelineConfigBuilder::new()
            .ph(cli.ph)
            .repeats(cli.repeats)
            .repair_command(repair.command.unwrap_or(defaults.repair_command))
            .annotator_command(annotator.command.unwrap_or(defaults.annotator_command))
            .annotator_log(annotator.log.unwrap_or(defaults.annotator_log))
            .annotator_output(annotator.output.map(Into::into).unwrap_or_default())
            .annotator_log_stdout(annotator.log_stdout.unwrap_or(false))
            .feature_command(features.command.unwrap_or(defaults.feature_command))
            .heavy_chain(features.heavy_chain.unwrap_or(defaults.heavy_chain))
            .light_chain(features.light_chain.unwrap_or(defaults.light_chain))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse_cli(extra: &[&str]) -> Cli {
        let mut args = vec!["mabfeat", "input.pdb"];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let cli = parse_cli(&[]);
        let config = PartialPipelineConfig::default()
            .merge_with_cli(&cli)
            .unwrap();

        assert_eq!(config.ph, 7.0);
        assert_eq!(config.repeats, 1);
        assert_eq!(config.repair.command, vec!["pdbfixer".to_string()]);
        assert_eq!(config.annotator.command, vec!["ImmunoPDB.py".to_string()]);
        assert_eq!(config.annotator.output, AnnotatorOutput::Temporary);
        assert_eq!(config.features.heavy_chain, "H");
        assert_eq!(config.features.light_chain, "L");
    }

    #[test]
    fn file_values_override_defaults_and_cli_flags_pass_through() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [repair]
            command = ["python", "fix_structure.py"]

            [annotator]
            command = ["python", "ImmunoPDB.py"]
            log = "immuno.log"
            output = "derived"
            log-stdout = true

            [features]
            command = ["compute-patches", "--surface"]
            heavy-chain = "A"
            light-chain = "B"
            "#,
        )
        .unwrap();

        let cli = parse_cli(&["-r", "3", "--pH", "6.0"]);
        let config = PartialPipelineConfig::from_file(&config_path)
            .unwrap()
            .merge_with_cli(&cli)
            .unwrap();

        assert_eq!(config.ph, 6.0);
        assert_eq!(config.repeats, 3);
        assert_eq!(
            config.repair.command,
            vec!["python".to_string(), "fix_structure.py".to_string()]
        );
        assert_eq!(config.annotator.log_path, PathBuf::from("immuno.log"));
        assert_eq!(config.annotator.output, AnnotatorOutput::Derived);
        assert!(config.annotator.log_stdout);
        assert_eq!(
            config.features.command,
            vec!["compute-patches".to_string(), "--surface".to_string()]
        );
        assert_eq!(config.features.heavy_chain, "A");
        assert_eq!(config.features.light_chain, "B");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[annotator]\nretries = 3\n").unwrap();

        let result = PartialPipelineConfig::from_file(&config_path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_cli_values_surface_as_config_errors() {
        let cli = parse_cli(&["-r", "0"]);
        let result = PartialPipelineConfig::default().merge_with_cli(&cli);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
