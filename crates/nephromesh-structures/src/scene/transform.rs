//! Re-centering and reorientation of an assembled scene.

use std::f64::consts::FRAC_PI_2;

use glam::{DMat4, DVec3, Vec3};

use super::Scene;

/// A rigid transform baked into scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    matrix: DMat4,
}

impl SceneTransform {
    /// Wraps an arbitrary matrix.
    pub fn from_matrix(matrix: DMat4) -> Self {
        Self { matrix }
    }

    /// The canonical reorientation for a scene whose bounding box midpoint is
    /// `center`.
    ///
    /// A 90 degree rotation about the axis (-1, 0, 0) through `center`,
    /// followed by a translation of `center` to the origin, concatenated into
    /// one matrix. Net effect: `(x, y, z) -> (x - cx, z - cz, cy - y)`.
    pub fn reorientation(center: DVec3) -> Self {
        let rotate_about_center = DMat4::from_translation(center)
            * DMat4::from_axis_angle(DVec3::NEG_X, FRAC_PI_2)
            * DMat4::from_translation(-center);
        Self::from_matrix(DMat4::from_translation(-center) * rotate_about_center)
    }

    /// The canonical reorientation for `scene`, or `None` if it is empty.
    pub fn for_scene(scene: &Scene) -> Option<Self> {
        scene.center().map(|c| Self::reorientation(c.as_dvec3()))
    }

    /// Returns the 4x4 matrix.
    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    /// Returns the transform that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_matrix(self.matrix.inverse())
    }

    /// Transforms a single point.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.matrix.transform_point3(p.as_dvec3()).as_vec3()
    }
}

impl Scene {
    /// Bakes `transform` into every node's vertices and refreshes the bounds.
    pub fn apply_transform(&mut self, transform: &SceneTransform) {
        for node in &mut self.nodes {
            node.mesh.apply_transform(&transform.matrix);
        }
        self.update_extents();
    }
}

/// Moves the scene's bounding box midpoint to the origin and applies the
/// canonical rotation, returning the scene with the transform baked in
/// together with that transform.
///
/// An empty scene comes back unchanged, with no transform.
pub fn recenter_and_rotate(mut scene: Scene) -> (Scene, Option<SceneTransform>) {
    let Some(transform) = SceneTransform::for_scene(&scene) else {
        log::debug!("empty scene, nothing to reorient");
        return (scene, None);
    };
    log::debug!(
        "reorienting {} nodes about center {:?}",
        scene.len(),
        scene.center()
    );
    scene.apply_transform(&transform);
    (scene, Some(transform))
}
