//! Builds a scene from synthetic segmentations and prints the run report.
//!
//! Run with `RUST_LOG=info cargo run --example synthetic_kidneys_demo`.
//! Pass two NIfTI paths (body, kidney) to process real data instead.

use nephromesh::*;

/// Whether voxel `p` lies in the ellipsoid centered at `c` with radii `r`.
fn in_ellipsoid(p: UVec3, c: Vec3, r: Vec3) -> bool {
    let d = (p.as_vec3() - c) / r;
    d.length_squared() <= 1.0
}

fn in_kidney(p: UVec3) -> bool {
    in_ellipsoid(p, Vec3::new(14.0, 24.0, 20.0), Vec3::new(6.0, 8.0, 9.0))
        || in_ellipsoid(p, Vec3::new(50.0, 24.0, 60.0), Vec3::new(5.0, 8.0, 8.0))
}

fn synthetic_volumes() -> (ScalarVolume, ScalarVolume) {
    let dims = UVec3::new(64, 48, 80);
    let spacing = Vec3::new(0.8, 0.8, 1.5);

    // The body segmentation marks the kidneys coarsely; the kidney volume
    // carries the shape that ends up in the scene.
    let body = ScalarVolume::from_fn(dims, spacing, |p| {
        if in_ellipsoid(p, Vec3::new(20.0, 24.0, 22.0), Vec3::splat(5.0)) {
            1 // Tumor
        } else if in_kidney(p) {
            2 // Kidney
        } else if (30..=33).contains(&p.x) && (22..=25).contains(&p.y) && (4..=75).contains(&p.z) {
            3 // Artery
        } else if (36..=39).contains(&p.x) && (22..=25).contains(&p.y) && (4..=75).contains(&p.z) {
            4 // Vein
        } else if in_ellipsoid(p, Vec3::new(14.0, 24.0, 20.0), Vec3::new(10.0, 12.0, 12.0))
            || in_ellipsoid(p, Vec3::new(50.0, 24.0, 60.0), Vec3::new(9.0, 11.0, 11.0))
        {
            6 // Fat
        } else {
            0
        }
    });

    let kidney = ScalarVolume::from_fn(dims, spacing, |p| i32::from(in_kidney(p)) * 2);

    (body, kidney)
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = if let [body, kidney] = args.as_slice() {
        build_scene(body, kidney)?
    } else {
        let (body, kidney) = synthetic_volumes();
        build_scene_from_volumes(&body, &kidney)?
    };

    for node in output.scene.iter() {
        let (min, max) = node.mesh().bounding_box();
        println!(
            "{:<10} {:>7} vertices {:>7} faces  [{min} .. {max}]",
            node.name(),
            node.mesh().num_vertices(),
            node.mesh().num_faces()
        );
    }
    println!("{}", output.report().to_json()?);
    Ok(())
}
