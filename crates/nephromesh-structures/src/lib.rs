//! Structure implementations for nephromesh.
//!
//! This crate provides the mesh-side half of the pipeline:
//! - Triangle meshes built from polygon soups
//! - Connected components and left/right splitting of bilateral structures
//! - Scenes of uniquely named meshes, their assembly and reorientation

// Mesh code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod scene;
pub mod triangle_mesh;

pub use error::MeshError;
pub use scene::{recenter_and_rotate, AssembledScene, Scene, SceneAssembler, SceneNode, SceneTransform};
pub use triangle_mesh::{fan_triangulate, MeshTag, Side, TriangleMesh};
