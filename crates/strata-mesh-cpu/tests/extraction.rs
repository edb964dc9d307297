use std::collections::HashMap;

use proptest::prelude::*;
use strata_field::{FieldGrid, GridDims};
use strata_geom::Vec3;
use strata_mesh_cpu::{Mesh, extract, extract_contour, extract_filled};

fn key(m: &Mesh, i: u32) -> [u32; 3] {
    let p = m.position(i);
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Every directed edge has a matching reverse edge.
fn is_closed(m: &Mesh) -> bool {
    let mut counts: HashMap<([u32; 3], [u32; 3]), i32> = HashMap::new();
    for [a, b, c] in m.triangles() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let (ku, kv) = (key(m, u), key(m, v));
            if ku == kv {
                continue;
            }
            *counts.entry((ku, kv)).or_default() += 1;
        }
    }
    counts
        .iter()
        .all(|((u, v), n)| counts.get(&(*v, *u)).copied().unwrap_or(0) == *n)
}

fn signed_volume(m: &Mesh) -> f32 {
    m.triangles()
        .map(|[a, b, c]| m.position(a).dot(m.position(b).cross(m.position(c))) / 6.0)
        .sum()
}

fn sphere(n: usize, center: Vec3, radius: f32) -> FieldGrid {
    FieldGrid::from_fn(GridDims::volume(n, n, n), |x, y, z| {
        radius - (Vec3::new(x as f32, y as f32, z as f32) - center).length()
    })
    .unwrap()
}

#[test]
fn layered_cube_yields_one_horizontal_quad() {
    let g = FieldGrid::from_fn(GridDims::volume(2, 2, 2), |_, _, z| z as f32).unwrap();
    let m = extract(&g, 0.5).unwrap();
    assert_eq!(m.triangle_count(), 2);
    assert_eq!(m.vertex_count(), 4);
    for i in 0..4 {
        assert_eq!(m.position(i).z, 0.5);
        assert_eq!(m.normal(i), Vec3::new(0.0, 0.0, -1.0));
    }
    let mut corners: Vec<(f32, f32)> = (0..4).map(|i| (m.position(i).x, m.position(i).y)).collect();
    corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(corners, vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]);
}

#[test]
fn sphere_is_closed_and_faces_outward() {
    let center = Vec3::new(7.3, 7.1, 6.9);
    let radius = 5.37;
    let m = extract(&sphere(16, center, radius), 0.0).unwrap();
    assert!(m.is_well_formed());
    assert!(is_closed(&m));
    let expected = 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
    let vol = signed_volume(&m);
    assert!((vol - expected).abs() / expected < 0.05, "volume {vol} vs {expected}");
    for i in 0..m.vertex_count() as u32 {
        assert!(m.normal(i).dot(m.position(i) - center) > 0.0);
    }
}

#[test]
fn cell_size_and_origin_place_vertices() {
    let center = Vec3::new(4.2, 4.4, 3.9);
    let g = sphere(9, center, 2.6).with_cell_size(0.5).with_origin(Vec3::new(10.0, 0.0, -3.0));
    let m = extract(&g, 0.0).unwrap();
    let bb = m.bounds();
    assert!(bb.min.x > 10.0 && bb.max.x < 14.0);
    assert!(bb.min.z > -3.0 && bb.max.z < 1.0);
    assert!(m.uv.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn planar_extract_is_contour_walls() {
    let g = FieldGrid::from_fn(GridDims::planar(8, 8), |x, y, _| {
        let (dx, dy) = (x as f32 - 3.6, y as f32 - 3.3);
        2.4 - (dx * dx + dy * dy).sqrt()
    })
    .unwrap()
    .with_cell_size(2.0);
    let walls = extract(&g, 0.0).unwrap();
    assert_eq!(walls, extract_contour(&g, 0.0, 2.0).unwrap());
    assert!(walls.triangle_count() > 0);
    let floor = extract_filled(&g, 0.0).unwrap();
    assert!(floor.triangle_count() > 0);
    assert!(floor.norm.chunks_exact(3).all(|n| n[1] > 0.99));
    for [a, _, _] in walls.triangles() {
        let p = walls.position(a);
        let outward = Vec3::new(p.x - 7.2, 0.0, p.z - 6.6);
        assert!(walls.normal(a).dot(outward) > 0.0);
    }
}

fn volume_strategy() -> impl Strategy<Value = (usize, usize, usize, Vec<f32>)> {
    (2usize..6, 2usize..6, 2usize..6).prop_flat_map(|(w, h, d)| {
        (
            Just(w),
            Just(h),
            Just(d),
            prop::collection::vec(0.0f32..1.0, w * h * d),
        )
    })
}

proptest! {
    #[test]
    fn random_fields_mesh_well_formed((w, h, d, samples) in volume_strategy(), thr in 0.05f32..0.95) {
        let g = FieldGrid::from_samples(GridDims::volume(w, h, d), samples).unwrap();
        let m = extract(&g, thr).unwrap();
        prop_assert!(m.is_well_formed());
        prop_assert_eq!(m.idx.len() % 3, 0);
    }

    #[test]
    fn threshold_above_max_is_empty((w, h, d, samples) in volume_strategy()) {
        let g = FieldGrid::from_samples(GridDims::volume(w, h, d), samples).unwrap();
        let (_, hi) = g.min_max();
        let m = extract(&g, hi).unwrap();
        prop_assert_eq!(m.triangle_count(), 0);
        prop_assert_eq!(m.vertex_count(), 0);
    }

    #[test]
    fn enclosed_random_blobs_are_closed(inner in prop::collection::vec(0.0f32..1.0, 4 * 4 * 4)) {
        // Interior samples are random; the outer shell stays below threshold.
        let g = FieldGrid::from_fn(GridDims::volume(6, 6, 6), |x, y, z| {
            if x == 0 || y == 0 || z == 0 || x == 5 || y == 5 || z == 5 {
                0.0
            } else {
                inner[((z - 1) * 4 + (y - 1)) * 4 + (x - 1)]
            }
        })
        .unwrap();
        let m = extract(&g, 0.5).unwrap();
        prop_assert!(is_closed(&m));
    }
}
