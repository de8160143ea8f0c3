//! Error types for nephromesh.
//!
//! Errors are split by severity. [`LoadError`] is fatal for a run,
//! [`LabelError`] is absorbed at the per-label boundary and only reported,
//! and [`NephroError`] covers everything else the library can fail on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for nephromesh operations.
#[derive(Error, Debug)]
pub enum NephroError {
    /// One of the required input volumes could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A scene node with the given name already exists.
    #[error("scene node '{0}' already exists")]
    NodeExists(String),

    /// A scene node with the given name was not found.
    #[error("scene node '{0}' not found")]
    NodeNotFound(String),

    /// The label table violates one of its invariants.
    #[error("invalid label table: {0}")]
    InvalidLabelTable(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Failure to turn a file into a [`ScalarVolume`](crate::ScalarVolume).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read volume '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file ended before the header or voxel data was complete.
    #[error("volume '{path}' is truncated: need {expected} bytes, found {actual}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// The file is not a single-file NIfTI-1 image.
    #[error("volume '{path}' is not a NIfTI-1 image: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// The voxel datatype code is not one we decode.
    #[error("volume '{path}' uses unsupported NIfTI datatype {code}")]
    UnsupportedDatatype { path: PathBuf, code: i16 },
}

/// A non-fatal, per-label failure. The label is skipped and the run goes on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelError {
    /// The label produced no surface in its source volume.
    #[error("label '{label}' produced an empty surface")]
    EmptyExtraction { label: String },

    /// The polygon soup could not be turned into a triangle mesh.
    #[error("label '{label}' could not be converted to a triangle mesh: {reason}")]
    ConversionFailure { label: String, reason: String },

    /// A bilateral label decomposed into zero usable components.
    #[error("label '{label}' has no connected components to split")]
    SplitFailure { label: String },
}

impl LabelError {
    /// Returns the name of the label this error belongs to.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::EmptyExtraction { label }
            | Self::ConversionFailure { label, .. }
            | Self::SplitFailure { label } => label,
        }
    }
}

/// A specialized Result type for nephromesh operations.
pub type Result<T> = std::result::Result<T, NephroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_error_reports_its_label() {
        let err = LabelError::ConversionFailure {
            label: "Fat".into(),
            reason: "no faces".into(),
        };
        assert_eq!(err.label(), "Fat");
        assert!(err.to_string().contains("no faces"));
    }

    #[test]
    fn label_error_serializes_with_kind_tag() {
        let err = LabelError::EmptyExtraction {
            label: "Ureter".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"empty_extraction","label":"Ureter"}"#);
    }

    #[test]
    fn load_error_converts_into_nephro_error() {
        let err: NephroError = LoadError::InvalidFormat {
            path: PathBuf::from("a.nii"),
            reason: "bad magic".into(),
        }
        .into();
        assert!(matches!(err, NephroError::Load(_)));
        assert!(err.to_string().contains("bad magic"));
    }
}
