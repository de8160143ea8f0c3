//! Serializable run summary.

use nephromesh_core::{LabelError, Result};
use nephromesh_structures::{Scene, Side};
use serde::{Deserialize, Serialize};

/// Summary of one scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub name: String,
    pub label: String,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub vertices: usize,
    pub faces: usize,
    pub surface_area: f64,
}

/// What a pipeline run produced and what it left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub nodes: Vec<NodeSummary>,
    pub skipped: Vec<LabelError>,
    /// Scene bounds as `[min, max]`, absent for an empty scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f32; 3]; 2]>,
}

impl PipelineReport {
    pub fn new(scene: &Scene, skipped: &[LabelError]) -> Self {
        let nodes = scene
            .iter()
            .map(|node| {
                let mesh = node.mesh();
                NodeSummary {
                    name: node.name().to_string(),
                    label: mesh.tag().label.clone(),
                    value: mesh.tag().value,
                    side: mesh.tag().side,
                    vertices: mesh.num_vertices(),
                    faces: mesh.num_faces(),
                    surface_area: mesh.surface_area(),
                }
            })
            .collect();
        Self {
            nodes,
            skipped: skipped.to_vec(),
            bounds: scene
                .bounding_box()
                .map(|(min, max)| [min.to_array(), max.to_array()]),
        }
    }

    /// Names of the nodes, in scene order.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Names of the skipped labels, in label-table order.
    pub fn skipped_labels(&self) -> Vec<&str> {
        self.skipped.iter().map(LabelError::label).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
