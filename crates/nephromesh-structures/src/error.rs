//! Error types for mesh construction.

use thiserror::Error;

/// Reasons a triangle mesh cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// There were no points to build vertices from.
    #[error("no vertices")]
    NoVertices,

    /// There were no polygons, or every polygon was degenerate.
    #[error("no faces")]
    NoFaces,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {num_vertices} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        num_vertices: usize,
    },
}
