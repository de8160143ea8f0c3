//! Core abstractions for nephromesh.
//!
//! This crate provides the fundamental types used throughout nephromesh:
//! - [`ScalarVolume`] for labeled voxel grids
//! - [`LabelTable`] describing which structures to extract and how
//! - [`PolygonSoup`] and [`discrete_marching_cubes`] for isosurface extraction
//! - Error types and configuration [`Options`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Voxel indices and coordinates are converted between u32, usize and f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod error;
pub mod labels;
pub mod marching_cubes;
pub mod options;
pub mod polygon_soup;
pub mod volume;

pub use error::{LabelError, LoadError, NephroError, Result};
pub use labels::{LabelKind, LabelSource, LabelSpec, LabelTable};
pub use marching_cubes::discrete_marching_cubes;
pub use options::Options;
pub use polygon_soup::PolygonSoup;
pub use volume::ScalarVolume;

// Re-export glam types for convenience
pub use glam::{UVec3, Vec3};
