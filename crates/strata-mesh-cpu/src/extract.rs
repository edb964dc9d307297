use std::ops::Range;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use strata_field::{FieldGrid, GenError, GenResult};
use strata_geom::Vec3;

use crate::constants::{CUBE_CORNER_COUNT, CUBE_EDGE_COUNT};
use crate::contour;
use crate::mesh::Mesh;
use crate::tables::{CUBE_CORNERS, CUBE_EDGES, cube_case_index, cube_table};

/// Grid axis along which extraction work is split into independent slices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceAxis {
    #[default]
    X,
    Y,
    Z,
}

/// Half-open range of cell coordinates. Planar grids use a single `z` layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub x: Range<usize>,
    pub y: Range<usize>,
    pub z: Range<usize>,
}

impl CellRange {
    /// Every cell of `grid`.
    pub fn all(grid: &FieldGrid) -> Self {
        let z = if grid.is_volume() {
            0..grid.depth().saturating_sub(1)
        } else {
            0..1
        };
        Self {
            x: 0..grid.width().saturating_sub(1),
            y: 0..grid.height().saturating_sub(1),
            z,
        }
    }

    /// Number of one-cell slices along `axis`.
    pub fn slice_count(grid: &FieldGrid, axis: SliceAxis) -> usize {
        let all = Self::all(grid);
        match axis {
            SliceAxis::X => all.x.len(),
            SliceAxis::Y => all.y.len(),
            SliceAxis::Z => all.z.len(),
        }
    }

    /// The one-cell-thick slice `i` along `axis`.
    pub fn slice(grid: &FieldGrid, axis: SliceAxis, i: usize) -> Self {
        let mut r = Self::all(grid);
        match axis {
            SliceAxis::X => r.x = i..i + 1,
            SliceAxis::Y => r.y = i..i + 1,
            SliceAxis::Z => r.z = i..i + 1,
        }
        r
    }

    pub fn cell_count(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }
}

/// Point where the isosurface crosses the edge `p0 -> p1`.
///
/// `t = clamp01((threshold - v0) / (v1 - v0))`; equal samples give `t = 0`.
#[inline]
pub fn interpolate_edge(p0: Vec3, p1: Vec3, v0: f32, v1: f32, threshold: f32) -> Vec3 {
    let t = if v0 == v1 {
        0.0
    } else {
        ((threshold - v0) / (v1 - v0)).clamp(0.0, 1.0)
    };
    p0.lerp(p1, t)
}

/// Planar XZ projection normalized over the grid extent.
#[inline]
pub(crate) fn planar_uv(grid: &FieldGrid, extent: Vec3, p: Vec3) -> [f32; 2] {
    let o = grid.origin();
    let u = if extent.x > 0.0 { (p.x - o.x) / extent.x } else { 0.0 };
    let v = if extent.z > 0.0 { (p.z - o.z) / extent.z } else { 0.0 };
    [u, v]
}

/// Isosurface of `grid` at `threshold`.
///
/// Volumes are meshed with marching cubes. Planar grids produce the contour
/// wall mesh with walls one cell tall.
pub fn extract(grid: &FieldGrid, threshold: f32) -> GenResult<Mesh> {
    if !grid.is_volume() {
        return contour::extract_contour(grid, threshold, grid.cell_size());
    }
    grid.dims().validate_for_cells()?;
    let t0 = Instant::now();
    let mut mesh = Mesh::new();
    extract_cells(grid, threshold, &CellRange::all(grid), &mut mesh);
    mesh.recalculate_normals();
    log::debug!(
        "marching cubes {}x{}x{}: {} verts, {} tris in {:.2}ms",
        grid.width(),
        grid.height(),
        grid.depth(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(mesh)
}

/// Marching cubes over `cells`, appending to `out` without touching normals.
///
/// Cells are visited x outermost, then y, then z. Each flagged edge is
/// interpolated once per cell; neighbouring cells do not share vertices.
/// Panics if `cells` reaches past the last cell of a volume grid.
pub fn extract_cells(grid: &FieldGrid, threshold: f32, cells: &CellRange, out: &mut Mesh) {
    assert!(grid.is_volume(), "marching cubes needs a volume grid");
    let table = cube_table();
    let extent = grid.extent();
    let samples = grid.samples();
    let mut values = [0.0f32; CUBE_CORNER_COUNT];
    let mut corners = [Vec3::ZERO; CUBE_CORNER_COUNT];
    for x in cells.x.clone() {
        for y in cells.y.clone() {
            for z in cells.z.clone() {
                for (i, c) in CUBE_CORNERS.iter().enumerate() {
                    let (cx, cy, cz) = (x + c[0] as usize, y + c[1] as usize, z + c[2] as usize);
                    values[i] = samples[grid.idx(cx, cy, cz)];
                    corners[i] = grid.world_position(cx, cy, cz);
                }
                let case = cube_case_index(&values, threshold);
                if table.entry(case).is_empty() {
                    continue;
                }
                let mut cache = [u32::MAX; CUBE_EDGE_COUNT];
                for tri in table.groups(case) {
                    let mut ids = [0u32; 3];
                    for (k, &e) in tri.iter().enumerate() {
                        let e = e as usize;
                        if cache[e] == u32::MAX {
                            let [a, b] = CUBE_EDGES[e];
                            let (a, b) = (a as usize, b as usize);
                            let p = interpolate_edge(
                                corners[a], corners[b], values[a], values[b], threshold,
                            );
                            cache[e] = out.push_vertex(p, planar_uv(grid, extent, p));
                        }
                        ids[k] = cache[e];
                    }
                    out.push_triangle(ids[0], ids[1], ids[2]);
                }
            }
        }
    }
}

/// Checks that `grid` can be meshed with marching cubes.
pub(crate) fn require_volume(grid: &FieldGrid, what: &'static str) -> GenResult<()> {
    if grid.is_volume() {
        return Ok(());
    }
    Err(GenError::InvalidDimensions {
        width: grid.width(),
        height: grid.height(),
        depth: grid.depth(),
        reason: what,
    })
}

/// Marching cubes over a volume grid; planar grids are rejected.
pub fn extract_volume(grid: &FieldGrid, threshold: f32) -> GenResult<Mesh> {
    require_volume(grid, "marching cubes needs a volume grid")?;
    extract(grid, threshold)
}
