use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flat mapping from descriptor name to numeric value for one repeat.
pub type FeatureMap = BTreeMap<String, f64>;

/// Aggregated result for one input file.
///
/// Serializes as a single-key JSON object: the original input path mapped to
/// the list of per-repeat feature maps. Failed repeats contribute no entry,
/// so the list length is anywhere between zero and the repeat count.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub features: Vec<FeatureMap>,
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.path.to_string_lossy(), &self.features)?;
        map.end()
    }
}
