//! End-to-end tests for the segmentation-to-scene pipeline.
//!
//! Volumes are synthesized as boxes of labeled voxels so every expected
//! centroid and node name can be worked out by hand.

use nephromesh::*;

/// Inclusive voxel box carrying one label.
struct Blob {
    label: i32,
    lo: UVec3,
    hi: UVec3,
}

fn blob(label: i32, lo: [u32; 3], hi: [u32; 3]) -> Blob {
    Blob {
        label,
        lo: UVec3::from_array(lo),
        hi: UVec3::from_array(hi),
    }
}

fn volume(dims: [u32; 3], blobs: &[Blob]) -> ScalarVolume {
    ScalarVolume::from_fn(UVec3::from_array(dims), Vec3::ONE, |p| {
        blobs
            .iter()
            .find(|b| p.cmpge(b.lo).all() && p.cmple(b.hi).all())
            .map_or(0, |b| b.label)
    })
}

fn empty(dims: [u32; 3]) -> ScalarVolume {
    volume(dims, &[])
}

/// Body segmentation that only marks the kidney label, which kidney-volume
/// extraction requires.
fn body_marking_kidneys(dims: [u32; 3]) -> ScalarVolume {
    volume(dims, &[blob(2, [1, 1, 1], [2, 2, 2])])
}

fn unoriented() -> Options {
    Options {
        reorient_scene: false,
        ..Options::default()
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("nephromesh-{}-{name}", std::process::id()))
}

#[test]
fn test_only_present_labels_become_nodes() {
    init_logging();
    let body = volume(
        [24, 24, 24],
        &[
            blob(1, [3, 3, 3], [8, 8, 8]),
            blob(3, [14, 14, 14], [18, 16, 20]),
        ],
    );
    let kidney = empty([24, 24, 24]);

    let out = build_scene_from_volumes(&body, &kidney).unwrap();
    assert_eq!(out.scene.names(), vec!["Tumor", "Artery"]);

    let report = out.report();
    assert_eq!(
        report.skipped_labels(),
        vec!["Kidney", "Vein", "Ureter", "Fat", "Renal_a", "Renal_v"]
    );
    assert!(report
        .skipped
        .iter()
        .all(|s| matches!(s, LabelError::EmptyExtraction { .. })));
}

#[test]
fn test_kidneys_named_by_depth() {
    // The far kidney is the larger one, so it is found first by size.
    let kidney = volume(
        [20, 20, 60],
        &[
            blob(2, [2, 2, 8], [6, 6, 12]),
            blob(2, [10, 10, 47], [16, 16, 53]),
        ],
    );
    let body = body_marking_kidneys([20, 20, 60]);

    let out = run(
        VolumePair {
            body: &body,
            kidney: &kidney,
        },
        &unoriented(),
    )
    .unwrap();
    assert_eq!(out.scene.names(), vec!["Kidney-L", "Kidney-R"]);
    assert!(out.transform.is_none());

    let left = out.scene.mesh("Kidney-L").unwrap();
    let right = out.scene.mesh("Kidney-R").unwrap();
    assert!((left.centroid().z - 10.0).abs() < 1e-4);
    assert!((right.centroid().z - 50.0).abs() < 1e-4);
    assert_eq!(left.tag().side, Some(Side::Left));
    assert!(right.num_faces() > left.num_faces());
}

#[test]
fn test_kidney_sides_survive_reorientation() {
    let kidney = volume(
        [20, 20, 60],
        &[
            blob(2, [10, 10, 47], [16, 16, 53]),
            blob(2, [2, 2, 8], [6, 6, 12]),
        ],
    );
    let out = build_scene_from_volumes(&body_marking_kidneys([20, 20, 60]), &kidney).unwrap();

    // Depth maps onto +Y after the rotation.
    let left = out.scene.mesh("Kidney-L").unwrap().centroid();
    let right = out.scene.mesh("Kidney-R").unwrap().centroid();
    assert!(left.y < right.y);
    assert!((right.y - left.y - 40.0).abs() < 1e-3);

    let (min, max) = out.scene.bounding_box().unwrap();
    assert!(((min + max) * 0.5).length() < 1e-4);
}

#[test]
fn test_fat_keeps_two_largest_components() {
    let body = volume(
        [40, 40, 40],
        &[
            blob(6, [2, 2, 2], [8, 8, 8]),
            blob(6, [30, 30, 30], [31, 31, 31]),
            blob(6, [20, 2, 20], [24, 6, 24]),
        ],
    );
    let out = run(
        VolumePair {
            body: &body,
            kidney: &empty([40, 40, 40]),
        },
        &unoriented(),
    )
    .unwrap();

    assert_eq!(out.scene.names(), vec!["Fat-L", "Fat-R"]);
    let left = out.scene.mesh("Fat-L").unwrap();
    let right = out.scene.mesh("Fat-R").unwrap();
    assert!((left.centroid().z - 5.0).abs() < 1e-4);
    assert!((right.centroid().z - 22.0).abs() < 1e-4);

    // Nothing from the smallest blob survives.
    let near_small = |v: &Vec3| v.cmpge(Vec3::splat(29.0)).all();
    assert!(!left.vertices().iter().any(near_small));
    assert!(!right.vertices().iter().any(near_small));
}

#[test]
fn test_runs_are_identical() {
    let body = volume(
        [24, 24, 24],
        &[
            blob(1, [3, 3, 3], [8, 8, 8]),
            blob(6, [12, 2, 2], [15, 5, 5]),
            blob(6, [12, 14, 14], [15, 20, 20]),
            blob(4, [2, 16, 4], [6, 21, 9]),
            blob(2, [18, 18, 18], [20, 20, 20]),
        ],
    );
    let kidney = volume([24, 24, 24], &[blob(2, [9, 9, 9], [13, 13, 13])]);

    let first = build_scene_from_volumes(&body, &kidney).unwrap();
    let second = build_scene_from_volumes(&body, &kidney).unwrap();
    assert_eq!(first, second);
    for (a, b) in first.scene.iter().zip(second.scene.iter()) {
        assert_eq!(a.mesh().position_bytes(), b.mesh().position_bytes());
        assert_eq!(a.mesh().index_bytes(), b.mesh().index_bytes());
    }
}

#[test]
fn test_custom_label_table() {
    let options = Options::from_json_str(
        r#"{
            "labels": [
                {"name": "Cyst", "value": 9},
                {"name": "Kidney", "value": 2, "kind": "bilateral", "source": "kidney"}
            ],
            "reorient_scene": false
        }"#,
    )
    .unwrap();
    let body = volume([16, 16, 16], &[blob(9, [4, 4, 4], [7, 7, 7])]);
    let out = run(
        VolumePair {
            body: &body,
            kidney: &empty([16, 16, 16]),
        },
        &options,
    )
    .unwrap();
    assert_eq!(out.scene.names(), vec!["Cyst"]);
    assert_eq!(out.report().skipped_labels(), vec!["Kidney"]);
}

#[test]
fn test_run_from_files() {
    let body = volume(
        [16, 16, 16],
        &[blob(1, [4, 4, 4], [9, 9, 9]), blob(2, [12, 12, 12], [13, 13, 13])],
    );
    let kidney = volume(
        [16, 16, 32],
        &[blob(2, [3, 3, 3], [6, 6, 6]), blob(2, [3, 3, 22], [6, 6, 26])],
    );
    let body_path = temp_path("body.nii");
    let kidney_path = temp_path("kidney.nii");
    save_volume(&body, &body_path).unwrap();
    save_volume(&kidney, &kidney_path).unwrap();

    let from_files = build_scene(&body_path, &kidney_path);
    std::fs::remove_file(&body_path).ok();
    std::fs::remove_file(&kidney_path).ok();

    let from_files = from_files.unwrap();
    assert_eq!(from_files, build_scene_from_volumes(&body, &kidney).unwrap());
    assert_eq!(from_files.scene.names(), vec!["Tumor", "Kidney-L", "Kidney-R"]);
}

#[test]
fn test_missing_volume_is_fatal() {
    let body_path = temp_path("present.nii");
    save_volume(&empty([4, 4, 4]), &body_path).unwrap();
    let err = build_scene(&body_path, temp_path("absent.nii")).unwrap_err();
    std::fs::remove_file(&body_path).ok();
    assert!(matches!(err, NephroError::Load(LoadError::Io { .. })));
}

#[test]
fn test_kidney_needs_body_segmentation() {
    let kidney = volume([16, 16, 16], &[blob(2, [3, 3, 3], [6, 6, 6])]);
    let out = build_scene_from_volumes(&empty([16, 16, 16]), &kidney).unwrap();
    assert!(out.scene.is_empty());
    assert_eq!(out.report().skipped_labels()[1], "Kidney");
}
