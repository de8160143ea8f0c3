//! Configuration options for a pipeline run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::labels::LabelTable;

/// Configuration for turning segmentations into a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Labels to extract, in scene order.
    pub labels: LabelTable,

    /// Whether to re-center the scene at the origin and apply the fixed
    /// reorientation. Disabling it leaves geometry in voxel-space coordinates.
    pub reorient_scene: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            labels: LabelTable::default(),
            reorient_scene: true,
        }
    }
}

impl Options {
    /// Parses options from JSON and validates the label table.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.labels.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NephroError;

    #[test]
    fn test_json_round_trip() {
        let options = Options::default();
        let json = options.to_json_string().unwrap();
        assert!(json.contains("\"Renal_v\""));
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options = Options::from_json_str(r#"{"reorient_scene": false}"#).unwrap();
        assert!(!options.reorient_scene);
        assert_eq!(options.labels, LabelTable::default());
    }

    #[test]
    fn test_invalid_table_rejected() {
        let json = r#"{"labels": [{"name": "A", "value": 1}, {"name": "B", "value": 1}]}"#;
        assert!(matches!(
            Options::from_json_str(json),
            Err(NephroError::InvalidLabelTable(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Options::from_json_str("{labels"),
            Err(NephroError::JsonError(_))
        ));
    }
}
