use crate::core::charge;
use crate::pipeline::config::FeatureConfig;
use crate::pipeline::error::PipelineError;
use crate::pipeline::record::FeatureMap;
use std::path::Path;
use tracing::debug;

/// Key under which the charge-asymmetry descriptor is reported.
pub const CHARGE_ASYMMETRY_KEY: &str = "charge_asym";

/// Computes the flat descriptor map for an annotated structure file.
pub trait Featurize: Send + Sync {
    fn featurize(&self, input: &Path) -> Result<FeatureMap, PipelineError>;
}

/// Production feature set: the patch descriptors printed by the external
/// feature command, merged with a natively computed charge-asymmetry scalar.
///
/// The external command is invoked as `<command...> <input>` and must print a
/// single flat JSON object of numeric values on stdout. The charge asymmetry
/// is the net heavy-chain charge minus the net light-chain charge of the
/// annotated structure at the run pH.
pub struct DescriptorSet {
    command: Vec<String>,
    heavy_chain: String,
    light_chain: String,
    ph: f64,
}

impl DescriptorSet {
    pub fn new(config: &FeatureConfig, ph: f64) -> Self {
        Self {
            command: config.command.clone(),
            heavy_chain: config.heavy_chain.clone(),
            light_chain: config.light_chain.clone(),
            ph,
        }
    }

    fn patch_features(&self, input: &Path) -> Result<FeatureMap, PipelineError> {
        let mut command = super::build_command(&self.command);
        command.arg(input);
        debug!("Running feature command: {:?}", command);

        let output = command
            .output()
            .map_err(|source| PipelineError::ToolLaunch {
                tool: "features",
                command: self.command.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(PipelineError::FeatureToolFailed {
                path: input.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| {
            PipelineError::FeatureToolOutput {
                path: input.to_path_buf(),
                source,
            }
        })
    }

    fn charge_asymmetry(&self, input: &Path) -> Result<f64, PipelineError> {
        let path_str = input.to_str().ok_or_else(|| PipelineError::Structure {
            path: input.to_path_buf(),
            details: "path is not valid UTF-8".to_string(),
        })?;
        let (structure, _warnings) =
            pdbtbx::open(path_str).map_err(|errors| PipelineError::Structure {
                path: input.to_path_buf(),
                details: errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            })?;

        let heavy = chain_net_charge(&structure, &self.heavy_chain, self.ph).ok_or_else(|| {
            PipelineError::ChainNotFound {
                chain_id: self.heavy_chain.clone(),
                path: input.to_path_buf(),
            }
        })?;
        let light = chain_net_charge(&structure, &self.light_chain, self.ph).ok_or_else(|| {
            PipelineError::ChainNotFound {
                chain_id: self.light_chain.clone(),
                path: input.to_path_buf(),
            }
        })?;

        Ok(heavy - light)
    }
}

fn chain_net_charge(structure: &pdbtbx::PDB, chain_id: &str, ph: f64) -> Option<f64> {
    let chain = structure.chains().find(|chain| chain.id() == chain_id)?;
    Some(
        chain
            .residues()
            .filter_map(|residue| residue.name())
            .map(|name| charge::sidechain_charge(name, ph))
            .sum(),
    )
}

impl Featurize for DescriptorSet {
    fn featurize(&self, input: &Path) -> Result<FeatureMap, PipelineError> {
        let mut features = self.patch_features(input)?;
        features.insert(
            CHARGE_ASYMMETRY_KEY.to_string(),
            self.charge_asymmetry(input)?,
        );
        Ok(features)
    }
}
