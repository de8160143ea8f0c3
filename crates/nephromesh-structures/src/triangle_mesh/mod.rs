//! Triangle mesh structure.

mod components;
mod geometry;

pub use geometry::fan_triangulate;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Body side of one half of a bilateral structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Lower depth coordinate.
    Left,
    /// Higher depth coordinate.
    Right,
}

impl Side {
    /// Returns the node-name suffix for this side.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

/// Identity of a mesh, attached when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshTag {
    /// Structure name from the label table.
    pub label: String,
    /// Voxel value the mesh was extracted from.
    pub value: i32,
    /// Side, for halves of a bilateral structure.
    pub side: Option<Side>,
}

impl MeshTag {
    /// Creates a tag without a side.
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        Self {
            label: label.into(),
            value,
            side: None,
        }
    }

    /// Returns a copy of this tag for one side.
    #[must_use]
    pub fn with_side(&self, side: Side) -> Self {
        Self {
            side: Some(side),
            ..self.clone()
        }
    }

    /// Returns the scene node name: the label, suffixed "-L"/"-R" when sided.
    #[must_use]
    pub fn node_name(&self) -> String {
        match self.side {
            Some(side) => format!("{}-{}", self.label, side.suffix()),
            None => self.label.clone(),
        }
    }
}

/// A non-empty triangle mesh.
///
/// Vertices are kept exactly as given: no welding, re-indexing or normal
/// computation happens on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    tag: MeshTag,
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh, checking that it has faces and every index is in range.
    pub fn new(tag: MeshTag, vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::NoVertices);
        }
        if faces.is_empty() {
            return Err(MeshError::NoFaces);
        }
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    num_vertices: vertices.len(),
                });
            }
        }
        Ok(Self {
            tag,
            vertices,
            faces,
        })
    }

    /// Returns the identity tag.
    pub fn tag(&self) -> &MeshTag {
        &self.tag
    }

    /// Replaces the identity tag.
    pub fn set_tag(&mut self, tag: MeshTag) {
        self.tag = tag;
    }

    /// Returns the scene node name derived from the tag.
    pub fn node_name(&self) -> String {
        self.tag.node_name()
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns the vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Returns the faces.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Vertex positions as a packed `f32` byte buffer (x, y, z per vertex).
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Face indices as a packed `u32` byte buffer (three per face).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag() -> MeshTag {
        MeshTag::new("Tumor", 1)
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            TriangleMesh::new(tag(), vec![], vec![]),
            Err(MeshError::NoVertices)
        );
        assert_eq!(
            TriangleMesh::new(tag(), vec![Vec3::ZERO], vec![]),
            Err(MeshError::NoFaces)
        );
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = TriangleMesh::new(tag(), vec![Vec3::ZERO; 3], vec![[0, 1, 2], [0, 3, 1]]);
        assert_eq!(
            err,
            Err(MeshError::IndexOutOfRange {
                face: 1,
                index: 3,
                num_vertices: 3
            })
        );
    }

    #[test]
    fn test_node_names() {
        assert_eq!(tag().node_name(), "Tumor");
        let kidney = MeshTag::new("Kidney", 2);
        assert_eq!(kidney.with_side(Side::Left).node_name(), "Kidney-L");
        assert_eq!(kidney.with_side(Side::Right).node_name(), "Kidney-R");
        assert_eq!(kidney.side, None);
    }

    #[test]
    fn test_byte_views() {
        let mesh = TriangleMesh::new(
            tag(),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(mesh.position_bytes().len(), 3 * 3 * 4);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
        assert_eq!(&mesh.position_bytes()[..4], &1.0_f32.to_ne_bytes());
        assert_eq!(&mesh.index_bytes()[4..8], &1_u32.to_ne_bytes());
    }
}
