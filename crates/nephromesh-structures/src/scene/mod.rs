//! Scene of named meshes.
//!
//! A [`Scene`] keeps its nodes in insertion order, which is label-table
//! order for scenes built by the pipeline, and tracks the bounding box of
//! all geometry it holds.

mod assemble;
mod transform;

pub use assemble::{AssembledScene, SceneAssembler};
pub use transform::{recenter_and_rotate, SceneTransform};

use glam::Vec3;
use nephromesh_core::{NephroError, Result};

use crate::triangle_mesh::TriangleMesh;

/// A named mesh registered in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    name: String,
    mesh: TriangleMesh,
}

impl SceneNode {
    /// Returns the node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node geometry.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }
}

/// An ordered collection of uniquely named meshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    bounding_box: Option<(Vec3, Vec3)>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mesh under its tag's node name.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> Result<()> {
        let name = mesh.node_name();
        self.add_node(name, mesh)
    }

    /// Registers a mesh under `name`.
    ///
    /// Returns an error if a node with the same name already exists.
    pub fn add_node(&mut self, name: impl Into<String>, mesh: TriangleMesh) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(NephroError::NodeExists(name));
        }
        self.bounding_box = Some(merge_bounds(self.bounding_box, mesh.bounding_box()));
        self.nodes.push(SceneNode { name, mesh });
        Ok(())
    }

    /// Gets a node by name.
    pub fn get(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Gets a node's mesh by name, or an error if it does not exist.
    pub fn mesh(&self, name: &str) -> Result<&TriangleMesh> {
        self.get(name)
            .map(SceneNode::mesh)
            .ok_or_else(|| NephroError::NodeNotFound(name.to_string()))
    }

    /// Checks if a node with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// Returns an iterator over nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// Returns the node names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(SceneNode::name).collect()
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the total vertex count over all nodes.
    pub fn num_vertices(&self) -> usize {
        self.nodes.iter().map(|n| n.mesh.num_vertices()).sum()
    }

    /// Returns the total face count over all nodes.
    pub fn num_faces(&self) -> usize {
        self.nodes.iter().map(|n| n.mesh.num_faces()).sum()
    }

    /// Returns the axis-aligned bounding box of all geometry, or `None` for an
    /// empty scene.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.bounding_box
    }

    /// Returns the midpoint of the bounding box.
    pub fn center(&self) -> Option<Vec3> {
        self.bounding_box.map(|(min, max)| (min + max) * 0.5)
    }

    /// Recomputes the bounding box from the node geometry.
    fn update_extents(&mut self) {
        self.bounding_box = self
            .nodes
            .iter()
            .map(|n| n.mesh.bounding_box())
            .reduce(|a, b| merge_bounds(Some(a), b));
    }
}

fn merge_bounds(acc: Option<(Vec3, Vec3)>, (min, max): (Vec3, Vec3)) -> (Vec3, Vec3) {
    match acc {
        Some((acc_min, acc_max)) => (acc_min.min(min), acc_max.max(max)),
        None => (min, max),
    }
}
