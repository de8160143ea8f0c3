//! Polygon soup produced by isosurface extraction.

use glam::Vec3;

/// A set of points and polygons over them.
///
/// Polygons are ordered lists of point indices and may have any arity.
/// Nothing about manifoldness, watertightness or index validity is
/// guaranteed; consumers check what they need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSoup {
    /// Point positions in world coordinates.
    pub points: Vec<Vec3>,
    /// Polygons as lists of indices into `points`.
    pub polygons: Vec<Vec<u32>>,
}

impl PolygonSoup {
    /// Creates a soup from points and polygons.
    pub fn new(points: Vec<Vec3>, polygons: Vec<Vec<u32>>) -> Self {
        Self { points, polygons }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of polygons.
    #[must_use]
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Returns true if the soup has no points or no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.polygons.is_empty()
    }
}
