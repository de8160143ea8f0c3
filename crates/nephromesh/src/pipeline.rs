//! The segmentation-to-scene pipeline.

use std::path::Path;

use nephromesh_core::{
    discrete_marching_cubes, LabelError, LabelKind, LabelSource, LabelSpec, Options, Result,
    ScalarVolume,
};
use nephromesh_structures::{
    recenter_and_rotate, MeshTag, Scene, SceneAssembler, SceneTransform, TriangleMesh,
};

use crate::loader::load_volume;
use crate::report::PipelineReport;

/// The two segmentations a run consumes.
#[derive(Debug, Clone, Copy)]
pub struct VolumePair<'a> {
    /// Whole-region segmentation.
    pub body: &'a ScalarVolume,
    /// Kidney-only segmentation.
    pub kidney: &'a ScalarVolume,
}

impl<'a> VolumePair<'a> {
    /// Returns the volume a label is extracted from.
    pub fn source(&self, source: LabelSource) -> &'a ScalarVolume {
        match source {
            LabelSource::Body => self.body,
            LabelSource::Kidney => self.kidney,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The assembled scene, reoriented unless disabled in [`Options`].
    pub scene: Scene,
    /// Labels that contributed no node, in label-table order.
    pub skipped: Vec<LabelError>,
    /// The transform that was baked into the scene, if any.
    pub transform: Option<SceneTransform>,
}

impl PipelineOutput {
    /// Summarizes this output.
    pub fn report(&self) -> PipelineReport {
        PipelineReport::new(&self.scene, &self.skipped)
    }
}

/// Extracts the whole surface of one label as a single mesh.
fn surface_mesh(
    spec: &LabelSpec,
    volume: &ScalarVolume,
) -> std::result::Result<TriangleMesh, LabelError> {
    let soup = discrete_marching_cubes(volume, spec.value);
    if soup.is_empty() {
        return Err(LabelError::EmptyExtraction {
            label: spec.name.clone(),
        });
    }
    log::debug!(
        "label '{}' ({}): {} points, {} polygons",
        spec.name,
        spec.value,
        soup.num_points(),
        soup.num_polygons()
    );

    TriangleMesh::from_polygon_soup(MeshTag::new(&spec.name, spec.value), soup).map_err(|err| {
        LabelError::ConversionFailure {
            label: spec.name.clone(),
            reason: err.to_string(),
        }
    })
}

/// Extracts one label from `volume` as one or more tagged meshes.
///
/// Single labels yield one mesh. Bilateral labels yield the "L" half and,
/// when a second component exists, the "R" half.
pub fn extract_label(
    spec: &LabelSpec,
    volume: &ScalarVolume,
) -> std::result::Result<Vec<TriangleMesh>, LabelError> {
    let mesh = surface_mesh(spec, volume)?;

    match spec.kind {
        LabelKind::Single => Ok(vec![mesh]),
        LabelKind::Bilateral => {
            let halves = mesh.split_left_right();
            match halves.len() {
                0 => Err(LabelError::SplitFailure {
                    label: spec.name.clone(),
                }),
                1 => {
                    log::warn!("label '{}' has a single component, emitting left side only", spec.name);
                    Ok(halves)
                }
                _ => Ok(halves),
            }
        }
    }
}

/// Extracts one label from its source volume in `volumes`.
///
/// A label read from the kidney volume must also be present in the body
/// volume: its body surface is extracted first and an empty or
/// unconvertible result skips the label before the kidney volume is used.
pub fn extract_from_pair(
    spec: &LabelSpec,
    volumes: VolumePair<'_>,
) -> std::result::Result<Vec<TriangleMesh>, LabelError> {
    if spec.source == LabelSource::Kidney {
        surface_mesh(spec, volumes.body)?;
    }
    extract_label(spec, volumes.source(spec.source))
}

/// Runs the full pipeline over already-loaded volumes.
///
/// Per-label problems are recorded in [`PipelineOutput::skipped`]; only an
/// invalid label table fails the run.
pub fn run(volumes: VolumePair<'_>, options: &Options) -> Result<PipelineOutput> {
    options.labels.validate()?;

    let mut assembler = SceneAssembler::new();
    for spec in &options.labels {
        let outcome = extract_from_pair(spec, volumes);
        let added = assembler.add_label(&spec.name, outcome)?;
        if added > 0 {
            log::info!("extracted '{}' into {added} node(s)", spec.name);
        }
    }
    let assembled = assembler.finish();

    let (scene, transform) = if options.reorient_scene {
        recenter_and_rotate(assembled.scene)
    } else {
        (assembled.scene, None)
    };

    log::info!(
        "scene has {} nodes ({} vertices, {} faces), {} labels skipped",
        scene.len(),
        scene.num_vertices(),
        scene.num_faces(),
        assembled.skipped.len()
    );
    Ok(PipelineOutput {
        scene,
        skipped: assembled.skipped,
        transform,
    })
}

/// Loads both segmentations from NIfTI files and runs the pipeline.
///
/// Failing to load either volume aborts the run before any extraction.
pub fn run_files(
    body_path: impl AsRef<Path>,
    kidney_path: impl AsRef<Path>,
    options: &Options,
) -> Result<PipelineOutput> {
    let body = load_volume(body_path)?;
    let kidney = load_volume(kidney_path)?;
    run(
        VolumePair {
            body: &body,
            kidney: &kidney,
        },
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nephromesh_core::{LabelTable, NephroError, UVec3, Vec3};
    use nephromesh_structures::Side;

    fn blobs(dims: UVec3, boxes: &[(i32, UVec3, UVec3)]) -> ScalarVolume {
        ScalarVolume::from_fn(dims, Vec3::ONE, |p| {
            boxes
                .iter()
                .find(|(_, lo, hi)| p.cmpge(*lo).all() && p.cmple(*hi).all())
                .map_or(0, |(label, _, _)| *label)
        })
    }

    #[test]
    fn test_extract_missing_label() {
        let vol = blobs(UVec3::splat(8), &[]);
        let err = extract_label(&LabelSpec::new("Vein", 4), &vol).unwrap_err();
        assert_eq!(
            err,
            LabelError::EmptyExtraction {
                label: "Vein".into()
            }
        );
    }

    #[test]
    fn test_extract_single() {
        let vol = blobs(UVec3::splat(8), &[(1, UVec3::splat(2), UVec3::splat(4))]);
        let meshes = extract_label(&LabelSpec::new("Tumor", 1), &vol).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].node_name(), "Tumor");
        assert_eq!(meshes[0].tag().value, 1);
    }

    #[test]
    fn test_extract_bilateral() {
        let vol = blobs(
            UVec3::new(8, 8, 20),
            &[
                (2, UVec3::new(2, 2, 13), UVec3::new(4, 4, 15)),
                (2, UVec3::new(2, 2, 2), UVec3::new(4, 4, 4)),
            ],
        );
        let spec = LabelSpec::new("Kidney", 2).bilateral();
        let meshes = extract_label(&spec, &vol).unwrap();
        let names: Vec<_> = meshes.iter().map(TriangleMesh::node_name).collect();
        assert_eq!(names, vec!["Kidney-L", "Kidney-R"]);
        assert_eq!(meshes[0].tag().side, Some(Side::Left));
        assert!(meshes[0].centroid().z < meshes[1].centroid().z);
    }

    #[test]
    fn test_run_rejects_bad_table() {
        let vol = blobs(UVec3::splat(4), &[]);
        let mut options = Options::default();
        options.labels = serde_json::from_str::<LabelTable>(
            r#"[{"name": "A", "value": 1}, {"name": "A", "value": 2}]"#,
        )
        .unwrap();
        let err = run(
            VolumePair {
                body: &vol,
                kidney: &vol,
            },
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, NephroError::InvalidLabelTable(_)));
    }

    #[test]
    fn test_kidney_source_volume() {
        let body = blobs(
            UVec3::splat(8),
            &[(1, UVec3::splat(1), UVec3::splat(2)), (2, UVec3::splat(4), UVec3::splat(5))],
        );
        let kidney = blobs(UVec3::splat(8), &[(2, UVec3::splat(2), UVec3::splat(4))]);
        let out = run(
            VolumePair {
                body: &body,
                kidney: &kidney,
            },
            &Options::default(),
        )
        .unwrap();
        assert_eq!(out.scene.names(), vec!["Tumor", "Kidney-L"]);
        assert!(out.transform.is_some());

        // The kidney node carries the kidney volume's geometry, not the body's.
        let (min, max) = out.scene.mesh("Kidney-L").unwrap().bounding_box();
        let tumor = out.scene.mesh("Tumor").unwrap().bounding_box();
        assert!((max - min).x > (tumor.1 - tumor.0).x);
    }

    #[test]
    fn test_kidney_requires_body_label() {
        let body = blobs(UVec3::splat(8), &[(1, UVec3::splat(2), UVec3::splat(4))]);
        let kidney = blobs(UVec3::splat(8), &[(2, UVec3::splat(2), UVec3::splat(4))]);
        let out = run(
            VolumePair {
                body: &body,
                kidney: &kidney,
            },
            &Options::default(),
        )
        .unwrap();
        assert_eq!(out.scene.names(), vec!["Tumor"]);
        assert!(out.skipped.contains(&LabelError::EmptyExtraction {
            label: "Kidney".into()
        }));
    }

    #[test]
    fn test_empty_kidney_volume_is_skipped() {
        let body = blobs(UVec3::splat(8), &[(2, UVec3::splat(2), UVec3::splat(4))]);
        let kidney = blobs(UVec3::splat(8), &[]);
        let out = run(
            VolumePair {
                body: &body,
                kidney: &kidney,
            },
            &Options::default(),
        )
        .unwrap();
        assert!(out.scene.is_empty());
        assert!(out.transform.is_none());
        assert!(out.skipped.contains(&LabelError::EmptyExtraction {
            label: "Kidney".into()
        }));
    }
}
