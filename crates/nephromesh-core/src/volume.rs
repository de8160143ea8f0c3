//! Labeled voxel volumes.

use glam::{UVec3, Vec3};

use crate::error::{NephroError, Result};

/// An immutable 3D grid of integer labels.
///
/// Voxels are stored with X varying fastest, then Y, then Z, which is the
/// on-disk order of NIfTI images. Voxel `(i, j, k)` sits at world position
/// `(i, j, k) * spacing`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarVolume {
    dims: UVec3,
    spacing: Vec3,
    data: Vec<i32>,
}

impl ScalarVolume {
    /// Creates a volume from raw voxel labels.
    ///
    /// Returns an error if `data` does not hold exactly `dims.x * dims.y * dims.z` values.
    pub fn new(dims: UVec3, spacing: Vec3, data: Vec<i32>) -> Result<Self> {
        let expected = voxel_count(dims);
        if data.len() != expected {
            return Err(NephroError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims,
            spacing,
            data,
        })
    }

    /// Creates a volume by evaluating `f` at every voxel index.
    pub fn from_fn(dims: UVec3, spacing: Vec3, mut f: impl FnMut(UVec3) -> i32) -> Self {
        let mut data = Vec::with_capacity(voxel_count(dims));
        for k in 0..dims.z {
            for j in 0..dims.y {
                for i in 0..dims.x {
                    data.push(f(UVec3::new(i, j, k)));
                }
            }
        }
        Self {
            dims,
            spacing,
            data,
        }
    }

    /// Returns the number of voxels along each axis.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Returns the voxel spacing along each axis.
    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Returns the total number of voxels.
    #[must_use]
    pub fn num_voxels(&self) -> usize {
        self.data.len()
    }

    /// Returns the raw voxel labels in X-fastest order.
    #[must_use]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Flattens a 3D voxel index to a linear index.
    #[inline]
    #[must_use]
    pub fn flatten_index(&self, i: u32, j: u32, k: u32) -> usize {
        i as usize
            + j as usize * self.dims.x as usize
            + k as usize * self.dims.x as usize * self.dims.y as usize
    }

    /// Gets the label at a 3D index, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, i: u32, j: u32, k: u32) -> Option<i32> {
        if i >= self.dims.x || j >= self.dims.y || k >= self.dims.z {
            return None;
        }
        self.data.get(self.flatten_index(i, j, k)).copied()
    }

    /// Returns the world position of a voxel.
    #[must_use]
    pub fn position_of_voxel(&self, i: u32, j: u32, k: u32) -> Vec3 {
        UVec3::new(i, j, k).as_vec3() * self.spacing
    }

    /// Returns the number of voxels carrying `label`.
    #[must_use]
    pub fn count_label(&self, label: i32) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }

    /// Returns true if any voxel carries `label`.
    #[must_use]
    pub fn contains_label(&self, label: i32) -> bool {
        self.data.contains(&label)
    }
}

fn voxel_count(dims: UVec3) -> usize {
    dims.x as usize * dims.y as usize * dims.z as usize
}
