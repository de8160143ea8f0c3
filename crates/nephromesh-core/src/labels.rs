//! Anatomical label table.
//!
//! The table is an ordered list of structures. Order matters: it is the order
//! in which labels are extracted, logged and added to the scene.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{NephroError, Result};

/// Whether a structure occurs once or on both sides of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// One mesh node named after the label.
    #[default]
    Single,
    /// Split into "-L" and "-R" nodes by connected components.
    Bilateral,
}

/// Which input volume a label is extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// The whole-region segmentation.
    #[default]
    Body,
    /// The higher-resolution kidney-only segmentation.
    Kidney,
}

/// One entry in the label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Structure name, used as the scene node name (or its prefix).
    pub name: String,
    /// Voxel value carrying this structure.
    pub value: i32,
    #[serde(default)]
    pub kind: LabelKind,
    #[serde(default)]
    pub source: LabelSource,
}

impl LabelSpec {
    /// Creates a single, body-volume label.
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
            kind: LabelKind::Single,
            source: LabelSource::Body,
        }
    }

    /// Marks this label as bilateral.
    #[must_use]
    pub fn bilateral(mut self) -> Self {
        self.kind = LabelKind::Bilateral;
        self
    }

    /// Sets the source volume.
    #[must_use]
    pub fn from_source(mut self, source: LabelSource) -> Self {
        self.source = source;
        self
    }

    /// Returns true if this label is split into left and right nodes.
    #[must_use]
    pub fn is_bilateral(&self) -> bool {
        self.kind == LabelKind::Bilateral
    }
}

/// Ordered mapping from structure name to label value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    entries: Vec<LabelSpec>,
}

impl LabelTable {
    /// Creates a table, checking that values are positive and distinct and
    /// names are non-empty and unique.
    pub fn new(entries: Vec<LabelSpec>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Checks the table invariants.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut values = HashSet::new();
        for spec in &self.entries {
            if spec.name.is_empty() {
                return Err(NephroError::InvalidLabelTable(
                    "label names must not be empty".into(),
                ));
            }
            if spec.value <= 0 {
                return Err(NephroError::InvalidLabelTable(format!(
                    "label '{}' has non-positive value {}",
                    spec.name, spec.value
                )));
            }
            if !names.insert(spec.name.as_str()) {
                return Err(NephroError::InvalidLabelTable(format!(
                    "duplicate label name '{}'",
                    spec.name
                )));
            }
            if !values.insert(spec.value) {
                return Err(NephroError::InvalidLabelTable(format!(
                    "duplicate label value {} (at '{}')",
                    spec.value, spec.name
                )));
            }
        }
        Ok(())
    }

    /// Returns the entries in extraction order.
    #[must_use]
    pub fn entries(&self) -> &[LabelSpec] {
        &self.entries
    }

    /// Iterates over the entries in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelSpec> {
        self.entries.iter()
    }

    /// Gets an entry by structure name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LabelSpec> {
        self.entries.iter().find(|s| s.name == name)
    }

    /// Gets an entry by voxel value.
    #[must_use]
    pub fn by_value(&self, value: i32) -> Option<&LabelSpec> {
        self.entries.iter().find(|s| s.value == value)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelTable {
    /// The kidney segmentation label set.
    fn default() -> Self {
        Self {
            entries: vec![
                LabelSpec::new("Tumor", 1),
                LabelSpec::new("Kidney", 2)
                    .bilateral()
                    .from_source(LabelSource::Kidney),
                LabelSpec::new("Artery", 3),
                LabelSpec::new("Vein", 4),
                LabelSpec::new("Ureter", 5),
                LabelSpec::new("Fat", 6).bilateral(),
                LabelSpec::new("Renal_a", 7),
                LabelSpec::new("Renal_v", 8),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a LabelTable {
    type Item = &'a LabelSpec;
    type IntoIter = std::slice::Iter<'a, LabelSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
