//! nephromesh: labeled kidney segmentations to a combined surface-mesh scene.
//!
//! Two label volumes go in: a whole-region segmentation and a kidney-only
//! one. Each anatomical label is turned into a surface with discrete
//! marching cubes, bilateral structures are split into left and right
//! halves, and the meshes are collected into one [`Scene`] that is then
//! re-centered and rotated into a canonical orientation.
//!
//! # Quick Start
//!
//! ```no_run
//! use nephromesh::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let output = build_scene("body.nii.gz", "kidney.nii.gz")?;
//!     for node in output.scene.iter() {
//!         println!("{}: {} faces", node.name(), node.mesh().num_faces());
//!     }
//!     println!("{}", output.report().to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! Labels that are missing from the input are not errors; they show up in
//! [`PipelineOutput::skipped`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod loader;
pub mod pipeline;
pub mod report;

use std::path::Path;

// Re-export core types
pub use nephromesh_core::{
    discrete_marching_cubes, LabelError, LabelKind, LabelSource, LabelSpec, LabelTable,
    LoadError, NephroError, Options, PolygonSoup, Result, ScalarVolume, UVec3, Vec3,
};

// Re-export structures
pub use nephromesh_structures::{
    fan_triangulate, recenter_and_rotate, AssembledScene, MeshError, MeshTag, Scene,
    SceneAssembler, SceneNode, SceneTransform, Side, TriangleMesh,
};

pub use loader::{encode_nifti, load_volume, save_volume};
pub use pipeline::{extract_from_pair, extract_label, run, run_files, PipelineOutput, VolumePair};
pub use report::{NodeSummary, PipelineReport};

/// Installs `env_logger` as the `log` backend, honoring `RUST_LOG`.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Builds the scene for a body and a kidney segmentation with default options.
pub fn build_scene(
    body_path: impl AsRef<Path>,
    kidney_path: impl AsRef<Path>,
) -> Result<PipelineOutput> {
    run_files(body_path, kidney_path, &Options::default())
}

/// Builds the scene from in-memory volumes with default options.
pub fn build_scene_from_volumes(
    body: &ScalarVolume,
    kidney: &ScalarVolume,
) -> Result<PipelineOutput> {
    run(VolumePair { body, kidney }, &Options::default())
}
