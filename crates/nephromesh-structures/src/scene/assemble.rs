//! Accumulates per-label outcomes into a scene.

use nephromesh_core::{LabelError, Result};

use super::Scene;
use crate::triangle_mesh::TriangleMesh;

/// Builds a [`Scene`] from per-label results, keeping a record of every
/// label that contributed nothing.
#[derive(Debug, Default)]
pub struct SceneAssembler {
    scene: Scene,
    skipped: Vec<LabelError>,
}

/// The output of a [`SceneAssembler`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledScene {
    pub scene: Scene,
    /// Labels that were left out, in the order they were reported.
    pub skipped: Vec<LabelError>,
}

impl SceneAssembler {
    /// Creates a new assembler with an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the outcome of one label.
    ///
    /// Each mesh becomes a node named after its tag. A failed label, or one
    /// that produced no meshes, is recorded as skipped and logged; it is not
    /// an error. Returns the number of nodes added. A name collision is an
    /// error because it means the label table itself is inconsistent.
    pub fn add_label(
        &mut self,
        label: &str,
        outcome: std::result::Result<Vec<TriangleMesh>, LabelError>,
    ) -> Result<usize> {
        let meshes = match outcome {
            Ok(meshes) if meshes.is_empty() => {
                self.skip(LabelError::EmptyExtraction {
                    label: label.to_string(),
                });
                return Ok(0);
            }
            Ok(meshes) => meshes,
            Err(err) => {
                self.skip(err);
                return Ok(0);
            }
        };

        let added = meshes.len();
        for mesh in meshes {
            let name = mesh.node_name();
            log::debug!(
                "adding node '{name}' ({} vertices, {} faces)",
                mesh.num_vertices(),
                mesh.num_faces()
            );
            self.scene.add_node(name, mesh)?;
        }
        Ok(added)
    }

    /// Returns the labels skipped so far.
    pub fn skipped(&self) -> &[LabelError] {
        &self.skipped
    }

    /// Returns the scene built so far.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Finishes assembly.
    pub fn finish(self) -> AssembledScene {
        AssembledScene {
            scene: self.scene,
            skipped: self.skipped,
        }
    }

    fn skip(&mut self, reason: LabelError) {
        log::warn!("skipping '{}': {reason}", reason.label());
        self.skipped.push(reason);
    }
}

impl AssembledScene {
    /// Returns the names of the skipped labels.
    pub fn skipped_labels(&self) -> Vec<&str> {
        self.skipped.iter().map(LabelError::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle_mesh::{MeshTag, Side};
    use glam::Vec3;
    use nephromesh_core::NephroError;

    fn mesh(tag: MeshTag) -> TriangleMesh {
        TriangleMesh::new(tag, vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_skips_and_adds() {
        let mut assembler = SceneAssembler::new();
        let kidney = MeshTag::new("Kidney", 2);

        assert_eq!(
            assembler
                .add_label("Tumor", Ok(vec![mesh(MeshTag::new("Tumor", 1))]))
                .unwrap(),
            1
        );
        assert_eq!(assembler.add_label("Vein", Ok(vec![])).unwrap(), 0);
        assert_eq!(
            assembler
                .add_label(
                    "Kidney",
                    Ok(vec![
                        mesh(kidney.with_side(Side::Left)),
                        mesh(kidney.with_side(Side::Right)),
                    ]),
                )
                .unwrap(),
            2
        );
        let failure = LabelError::SplitFailure {
            label: "Fat".into(),
        };
        assert_eq!(assembler.add_label("Fat", Err(failure.clone())).unwrap(), 0);

        let out = assembler.finish();
        assert_eq!(out.scene.names(), vec!["Tumor", "Kidney-L", "Kidney-R"]);
        assert_eq!(out.skipped_labels(), vec!["Vein", "Fat"]);
        assert_eq!(
            out.skipped[0],
            LabelError::EmptyExtraction {
                label: "Vein".into()
            }
        );
        assert_eq!(out.skipped[1], failure);
    }

    #[test]
    fn test_name_collision_is_an_error() {
        let mut assembler = SceneAssembler::new();
        assembler
            .add_label("Tumor", Ok(vec![mesh(MeshTag::new("Tumor", 1))]))
            .unwrap();
        let err = assembler
            .add_label("Tumor", Ok(vec![mesh(MeshTag::new("Tumor", 1))]))
            .unwrap_err();
        assert!(matches!(err, NephroError::NodeExists(_)));
        assert_eq!(assembler.scene().len(), 1);
        assert!(assembler.skipped().is_empty());
    }
}
