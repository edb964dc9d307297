use std::collections::HashSet;

use strata_geom::Vec3;
use strata_mesh_cpu::tables::{CUBE_CORNERS, CUBE_EDGES, SQUARE_CORNERS, SQUARE_EDGES};
use strata_mesh_cpu::{cube_table, square_fill_table, square_table};

fn inside(case: usize, corner: u8) -> bool {
    case & (1 << corner) != 0
}

fn cube_edge_mid(e: u8) -> Vec3 {
    let [a, b] = CUBE_EDGES[e as usize];
    let (a, b) = (CUBE_CORNERS[a as usize], CUBE_CORNERS[b as usize]);
    Vec3::new(
        (a[0] + b[0]) as f32 * 0.5,
        (a[1] + b[1]) as f32 * 0.5,
        (a[2] + b[2]) as f32 * 0.5,
    )
}

fn corner_pos(c: usize) -> Vec3 {
    let p = CUBE_CORNERS[c];
    Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32)
}

#[test]
fn cube_table_is_complete() {
    let t = cube_table();
    assert_eq!(t.len(), 256);
    assert!(t.validate().is_ok());
    for case in 0..256 {
        let used: HashSet<u8> = t.entry(case).iter().copied().collect();
        let crossing: HashSet<u8> = (0..12u8)
            .filter(|&e| {
                let [a, b] = CUBE_EDGES[e as usize];
                inside(case, a) != inside(case, b)
            })
            .collect();
        assert_eq!(used, crossing, "case {case} must use exactly its crossing edges");
    }
}

#[test]
fn cube_cases_wind_consistently() {
    let t = cube_table();
    for case in 0..256 {
        let mut directed = HashSet::new();
        for tri in t.groups(case) {
            for k in 0..3 {
                let edge = (tri[k], tri[(k + 1) % 3]);
                assert!(directed.insert(edge), "case {case} repeats directed edge {edge:?}");
            }
        }
    }
}

#[test]
fn complementary_cases_cross_the_same_edges() {
    let t = cube_table();
    for case in 0..256 {
        let a: HashSet<u8> = t.entry(case).iter().copied().collect();
        let b: HashSet<u8> = t.entry(255 - case).iter().copied().collect();
        assert_eq!(a, b);
    }
}

#[test]
fn lone_corner_triangles_face_away_from_it() {
    let t = cube_table();
    for c in 0..8 {
        let tri = t.entry(1 << c);
        assert_eq!(tri.len(), 3);
        let (a, b, d) = (cube_edge_mid(tri[0]), cube_edge_mid(tri[1]), cube_edge_mid(tri[2]));
        let n = (b - a).cross(d - a);
        assert!(n.dot(a - corner_pos(c)) > 0.0, "corner {c}");

        // With every other corner inside, the normal points at the lone outside corner.
        let tri = t.entry(255 ^ (1 << c));
        let (a, b, d) = (cube_edge_mid(tri[0]), cube_edge_mid(tri[1]), cube_edge_mid(tri[2]));
        let n = (b - a).cross(d - a);
        assert!(n.dot(corner_pos(c) - a) > 0.0, "inverted corner {c}");
    }
}

#[test]
fn square_segments_keep_inside_on_the_left() {
    let t = square_table();
    assert_eq!(t.len(), 16);
    for case in 0..16 {
        let mut seen = HashSet::new();
        for seg in t.groups(case) {
            let mid = |e: u8| {
                let [a, b] = SQUARE_EDGES[e as usize];
                let (a, b) = (SQUARE_CORNERS[a as usize], SQUARE_CORNERS[b as usize]);
                ((a[0] + b[0]) as f32 * 0.5, (a[1] + b[1]) as f32 * 0.5)
            };
            let (ax, ay) = mid(seg[0]);
            let (bx, by) = mid(seg[1]);
            // Corner of the exit edge that lies inside.
            let [c0, c1] = SQUARE_EDGES[seg[0] as usize];
            let q = if inside(case, c0) { c0 } else { c1 };
            assert!(inside(case, q));
            let q = SQUARE_CORNERS[q as usize];
            let cross = (bx - ax) * (q[1] as f32 - ay) - (by - ay) * (q[0] as f32 - ax);
            assert!(cross > 0.0, "case {case} segment {seg:?}");
            assert!(seen.insert(seg[0]) && seen.insert(seg[1]));
        }
        let crossing = (0..4u8)
            .filter(|&e| {
                let [a, b] = SQUARE_EDGES[e as usize];
                inside(case, a) != inside(case, b)
            })
            .count();
        assert_eq!(seen.len(), crossing);
    }
}

#[test]
fn square_fill_covers_inside_corners() {
    let t = square_fill_table();
    for case in 0..16 {
        let corners: HashSet<u8> = t
            .entry(case)
            .iter()
            .copied()
            .filter(|&p| p >= 4)
            .map(|p| p - 4)
            .collect();
        let expected: HashSet<u8> = (0..4u8).filter(|&c| inside(case, c)).collect();
        assert_eq!(corners, expected, "case {case}");
    }
}
