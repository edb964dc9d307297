//! Case tables for marching cubes and marching squares.
//!
//! Tables are derived once from the cell topology below and validated before
//! first use. Corner bit `i` of a case index is set when corner `i` samples
//! strictly above the threshold ("inside").
use std::sync::OnceLock;

use strata_field::{GenError, GenResult};

use crate::constants::{
    CUBE_CASES, CUBE_CORNER_COUNT, CUBE_EDGE_COUNT, CUBE_FACE_COUNT, SEGMENT, SQUARE_CASES,
    SQUARE_CORNER_COUNT, SQUARE_EDGE_COUNT, SQUARE_FILL_POINTS, TRIANGLE,
};

/// Unit-cube corner offsets `(x, y, z)`.
pub const CUBE_CORNERS: [[u8; 3]; CUBE_CORNER_COUNT] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Cube edges as corner pairs, lower corner first.
pub const CUBE_EDGES: [[u8; 2]; CUBE_EDGE_COUNT] = [
    [0, 1],
    [1, 2],
    [3, 2],
    [0, 3],
    [4, 5],
    [5, 6],
    [7, 6],
    [4, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Unit-square corner offsets `(x, y)`, counter-clockwise.
pub const SQUARE_CORNERS: [[u8; 2]; SQUARE_CORNER_COUNT] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Square edges as corner pairs, lower corner first. Edge `k` joins cyclic
/// corners `k` and `k + 1`.
pub const SQUARE_EDGES: [[u8; 2]; SQUARE_EDGE_COUNT] = [[0, 1], [1, 2], [3, 2], [0, 3]];

/// Per-case lists of edge indices, grouped into triangles or segments.
#[derive(Clone, Debug)]
pub struct CaseTable {
    entries: Vec<Vec<u8>>,
    point_count: usize,
    group: usize,
}

impl CaseTable {
    /// Builds a table with `cases` entries whose values index `point_count`
    /// points in groups of `group`.
    pub fn from_entries(
        entries: Vec<Vec<u8>>,
        cases: usize,
        point_count: usize,
        group: usize,
    ) -> GenResult<Self> {
        if entries.len() != cases {
            return Err(GenError::InvalidCaseTable {
                case: entries.len(),
                reason: format!("expected {cases} cases"),
            });
        }
        let table = Self {
            entries,
            point_count,
            group,
        };
        table.validate()?;
        Ok(table)
    }

    /// Every entry must be a whole number of groups over valid point indices.
    pub fn validate(&self) -> GenResult<()> {
        for (case, entry) in self.entries.iter().enumerate() {
            if self.group == 0 || entry.len() % self.group != 0 {
                return Err(GenError::InvalidCaseTable {
                    case,
                    reason: format!("length {} is not a multiple of {}", entry.len(), self.group),
                });
            }
            if let Some(bad) = entry.iter().find(|&&e| e as usize >= self.point_count) {
                return Err(GenError::InvalidCaseTable {
                    case,
                    reason: format!("index {bad} is out of range 0..{}", self.point_count),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn group(&self) -> usize {
        self.group
    }

    #[inline]
    pub fn entry(&self, case: usize) -> &[u8] {
        &self.entries[case]
    }

    /// Triangles or segments of `case`.
    #[inline]
    pub fn groups(&self, case: usize) -> std::slice::ChunksExact<'_, u8> {
        self.entries[case].chunks_exact(self.group)
    }
}

fn checked(entries: Vec<Vec<u8>>, cases: usize, point_count: usize, group: usize) -> CaseTable {
    match CaseTable::from_entries(entries, cases, point_count, group) {
        Ok(t) => t,
        Err(e) => panic!("derived case table is malformed: {e}"),
    }
}

/// Marching-cubes triangle table: 256 cases over the 12 cube edges.
pub fn cube_table() -> &'static CaseTable {
    static CUBE: OnceLock<CaseTable> = OnceLock::new();
    CUBE.get_or_init(|| {
        let entries = (0..CUBE_CASES).map(|c| cube_polygons_to_triangles(c as u8)).collect();
        checked(entries, CUBE_CASES, CUBE_EDGE_COUNT, TRIANGLE)
    })
}

/// Marching-squares segment table: 16 cases over the 4 square edges.
pub fn square_table() -> &'static CaseTable {
    static SQUARE: OnceLock<CaseTable> = OnceLock::new();
    SQUARE.get_or_init(|| {
        let entries = (0..SQUARE_CASES).map(|c| square_segments(c as u8)).collect();
        checked(entries, SQUARE_CASES, SQUARE_EDGE_COUNT, SEGMENT)
    })
}

/// Marching-squares fill table. Points `0..4` are edge crossings and `4..8`
/// are corners `0..4`; triangles wind counter-clockwise in the grid plane.
pub fn square_fill_table() -> &'static CaseTable {
    static FILL: OnceLock<CaseTable> = OnceLock::new();
    FILL.get_or_init(|| {
        let entries = (0..SQUARE_CASES).map(|c| square_fill(c as u8)).collect();
        checked(entries, SQUARE_CASES, SQUARE_FILL_POINTS, TRIANGLE)
    })
}

/// Case index of a cube from its eight corner samples.
#[inline]
pub fn cube_case_index(values: &[f32; CUBE_CORNER_COUNT], threshold: f32) -> usize {
    let mut case = 0usize;
    for (i, v) in values.iter().enumerate() {
        if *v > threshold {
            case |= 1 << i;
        }
    }
    case
}

/// Case index of a square from its four corner samples.
#[inline]
pub fn square_case_index(values: &[f32; SQUARE_CORNER_COUNT], threshold: f32) -> usize {
    let mut case = 0usize;
    for (i, v) in values.iter().enumerate() {
        if *v > threshold {
            case |= 1 << i;
        }
    }
    case
}

// ---------------------------------------------------------------------------
// Cube derivation
//
// Inside corners are isolated by closed polygons whose vertices sit on the
// crossing edges. Each polygon is traced face by face: on a cube face the
// crossing edges pair up (two crossings pair directly; four crossings pair
// around each inside corner), and the walk alternates between an edge's two
// faces until it closes. Polygons are oriented so that viewed from outside a
// face the inside corner lies to the right of each step, which points the
// triangle normals toward the outside corners.

/// `(axis, side)` of each cube face.
const FACES: [(usize, u8); CUBE_FACE_COUNT] = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)];

fn corner(i: u8) -> [i32; 3] {
    let c = CUBE_CORNERS[i as usize];
    [c[0] as i32, c[1] as i32, c[2] as i32]
}

/// Edge midpoint in doubled coordinates.
fn edge_mid2(e: usize) -> [i32; 3] {
    let [a, b] = CUBE_EDGES[e];
    let (a, b) = (corner(a), corner(b));
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn on_face(c: u8, face: usize) -> bool {
    let (axis, side) = FACES[face];
    CUBE_CORNERS[c as usize][axis] == side
}

fn face_edges(face: usize) -> impl Iterator<Item = usize> {
    (0..CUBE_EDGE_COUNT).filter(move |&e| {
        let [a, b] = CUBE_EDGES[e];
        on_face(a, face) && on_face(b, face)
    })
}

fn edge_faces(e: usize) -> [usize; 2] {
    let mut out = [0; 2];
    let mut n = 0;
    for f in 0..CUBE_FACE_COUNT {
        if face_edges(f).any(|fe| fe == e) {
            out[n] = f;
            n += 1;
        }
    }
    debug_assert_eq!(n, 2);
    out
}

fn inside(mask: u8, c: u8) -> bool {
    mask & (1 << c) != 0
}

fn crossing(mask: u8, e: usize) -> bool {
    let [a, b] = CUBE_EDGES[e];
    inside(mask, a) != inside(mask, b)
}

fn inside_corner(mask: u8, e: usize) -> u8 {
    let [a, b] = CUBE_EDGES[e];
    if inside(mask, a) { a } else { b }
}

/// Crossing edge paired with `e` on `face`.
fn partner(mask: u8, face: usize, e: usize) -> Option<usize> {
    let crossings: Vec<usize> = face_edges(face).filter(|&fe| crossing(mask, fe)).collect();
    match crossings.len() {
        2 => crossings.into_iter().find(|&fe| fe != e),
        4 => {
            // Ambiguous face: pair the two edges meeting at the same inside corner.
            let q = inside_corner(mask, e);
            crossings
                .into_iter()
                .find(|&fe| fe != e && CUBE_EDGES[fe].contains(&q))
        }
        _ => None,
    }
}

/// True when stepping from edge `a` to edge `b` across `face` keeps the
/// inside corner of `a` on the right as seen from outside the cube.
fn step_is_outward(mask: u8, face: usize, a: usize, b: usize) -> bool {
    let pa = edge_mid2(a);
    let pb = edge_mid2(b);
    let q = corner(inside_corner(mask, a));
    let t = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
    let r = [2 * q[0] - pa[0], 2 * q[1] - pa[1], 2 * q[2] - pa[2]];
    let cross = [
        t[1] * r[2] - t[2] * r[1],
        t[2] * r[0] - t[0] * r[2],
        t[0] * r[1] - t[1] * r[0],
    ];
    let (axis, side) = FACES[face];
    let normal = if side == 1 { 1 } else { -1 };
    cross[axis] * normal < 0
}

fn cube_polygons(mask: u8) -> Vec<Vec<u8>> {
    let mut used = [false; CUBE_EDGE_COUNT];
    let mut polygons = Vec::new();
    for start in 0..CUBE_EDGE_COUNT {
        if used[start] || !crossing(mask, start) {
            continue;
        }
        used[start] = true;
        let mut poly = vec![start];
        let first_face = edge_faces(start)[0];
        let mut face = first_face;
        let mut cur = start;
        for _ in 0..CUBE_EDGE_COUNT {
            let Some(next) = partner(mask, face, cur) else {
                break;
            };
            if next == start {
                break;
            }
            used[next] = true;
            poly.push(next);
            let [f0, f1] = edge_faces(next);
            face = if f0 == face { f1 } else { f0 };
            cur = next;
        }
        if poly.len() >= 2 && !step_is_outward(mask, first_face, poly[0], poly[1]) {
            poly.reverse();
        }
        polygons.push(poly.into_iter().map(|e| e as u8).collect());
    }
    polygons
}

fn fan(poly: &[u8], out: &mut Vec<u8>) {
    for i in 1..poly.len().saturating_sub(1) {
        out.extend_from_slice(&[poly[0], poly[i], poly[i + 1]]);
    }
}

fn cube_polygons_to_triangles(mask: u8) -> Vec<u8> {
    let mut tris = Vec::new();
    for poly in cube_polygons(mask) {
        fan(&poly, &mut tris);
    }
    tris
}

// ---------------------------------------------------------------------------
// Square derivation
//
// Inside corners form cyclic runs. A run entered through edge `i - 1` and left
// through edge `j` yields the segment `j -> i - 1`, which keeps the run on its
// left, and the counter-clockwise fill polygon `i-1, corners i..=j, j`.

fn square_runs(mask: u8) -> Vec<(usize, usize)> {
    let n = SQUARE_CORNER_COUNT;
    let is_in = |c: usize| mask & (1 << (c % n)) != 0;
    let mut runs = Vec::new();
    if mask as usize == SQUARE_CASES - 1 {
        return runs;
    }
    for start in 0..n {
        if is_in(start) && !is_in(start + n - 1) {
            let mut end = start;
            while is_in(end + 1) {
                end += 1;
            }
            runs.push((start, end % n));
        }
    }
    runs
}

fn square_segments(mask: u8) -> Vec<u8> {
    let n = SQUARE_CORNER_COUNT;
    let mut out = Vec::new();
    for (start, end) in square_runs(mask) {
        let entry = (start + n - 1) % n;
        let exit = end;
        out.extend_from_slice(&[exit as u8, entry as u8]);
    }
    out
}

fn square_fill(mask: u8) -> Vec<u8> {
    let n = SQUARE_CORNER_COUNT;
    let corner_point = |c: usize| (SQUARE_EDGE_COUNT + c % n) as u8;
    let mut out = Vec::new();
    if mask as usize == SQUARE_CASES - 1 {
        let full: Vec<u8> = (0..n).map(corner_point).collect();
        fan(&full, &mut out);
        return out;
    }
    for (start, end) in square_runs(mask) {
        let mut poly = vec![((start + n - 1) % n) as u8];
        let mut c = start;
        loop {
            poly.push(corner_point(c));
            if c % n == end {
                break;
            }
            c += 1;
        }
        poly.push(end as u8);
        fan(&poly, &mut out);
    }
    out
}
