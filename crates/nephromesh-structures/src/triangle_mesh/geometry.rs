//! Geometry methods for triangle meshes.
//!
//! - Conversion from a polygon soup (fan triangulation)
//! - Bounding box, surface area and centroid
//! - Baking a rigid transform into the vertices

use glam::{DMat4, DVec3, Vec3};
use nephromesh_core::PolygonSoup;

use super::{MeshTag, TriangleMesh};
use crate::error::MeshError;

/// Fan-triangulates polygons.
///
/// For a polygon `[v0, v1, v2, v3, ...]` this emits
/// `[v0, v1, v2], [v0, v2, v3], [v0, v3, v4], ...`. Polygons with fewer than
/// three vertices are dropped.
#[must_use]
pub fn fan_triangulate(polygons: &[Vec<u32>]) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        if polygon.len() < 3 {
            continue;
        }
        let v0 = polygon[0];
        for i in 1..(polygon.len() - 1) {
            triangles.push([v0, polygon[i], polygon[i + 1]]);
        }
    }
    triangles
}

impl TriangleMesh {
    /// Builds a mesh from a polygon soup.
    ///
    /// Points become vertices verbatim and polygons are fan-triangulated.
    /// Fails when the soup has no points, yields no faces, or references
    /// points that do not exist.
    pub fn from_polygon_soup(tag: MeshTag, soup: PolygonSoup) -> Result<Self, MeshError> {
        let PolygonSoup { points, polygons } = soup;
        if points.is_empty() {
            return Err(MeshError::NoVertices);
        }
        let faces = fan_triangulate(&polygons);
        Self::new(tag, points, faces)
    }

    /// Returns the axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        )
    }

    /// Returns the total surface area.
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(|f| self.triangle_area(*f)).sum()
    }

    /// Returns the area-weighted centroid of the surface.
    ///
    /// Falls back to the mean of the referenced vertices when every face is
    /// degenerate.
    pub fn centroid(&self) -> Vec3 {
        let mut weighted = DVec3::ZERO;
        let mut total_area = 0.0;
        for &face in &self.faces {
            let area = self.triangle_area(face);
            let [a, b, c] = face.map(|i| self.vertices[i as usize].as_dvec3());
            weighted += (a + b + c) / 3.0 * area;
            total_area += area;
        }
        if total_area > 0.0 {
            return (weighted / total_area).as_vec3();
        }

        let mut sum = DVec3::ZERO;
        for &face in &self.faces {
            for i in face {
                sum += self.vertices[i as usize].as_dvec3();
            }
        }
        (sum / (self.faces.len() * 3) as f64).as_vec3()
    }

    /// Bakes `transform` into every vertex position.
    pub fn apply_transform(&mut self, transform: &DMat4) {
        for v in &mut self.vertices {
            *v = transform.transform_point3(v.as_dvec3()).as_vec3();
        }
    }

    fn triangle_area(&self, [a, b, c]: [u32; 3]) -> f64 {
        let a = self.vertices[a as usize].as_dvec3();
        let b = self.vertices[b as usize].as_dvec3();
        let c = self.vertices[c as usize].as_dvec3();
        (b - a).cross(c - a).length() * 0.5
    }
}
