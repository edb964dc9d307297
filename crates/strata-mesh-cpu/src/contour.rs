//! Marching squares over planar grids.
//!
//! Planar samples live in the world XZ plane. The contour mode extrudes each
//! isoline segment into a vertical wall; the filled mode triangulates the
//! above-threshold region flat on the ground plane.
use std::time::Instant;

use strata_field::{FieldGrid, GenError, GenResult};
use strata_geom::Vec3;

use crate::constants::{SQUARE_CORNER_COUNT, SQUARE_EDGE_COUNT, SQUARE_FILL_POINTS};
use crate::extract::{CellRange, interpolate_edge, planar_uv};
use crate::mesh::Mesh;
use crate::tables::{
    SQUARE_CORNERS, SQUARE_EDGES, square_case_index, square_fill_table, square_table,
};

fn require_planar(grid: &FieldGrid) -> GenResult<()> {
    if grid.is_volume() {
        return Err(GenError::InvalidDimensions {
            width: grid.width(),
            height: grid.height(),
            depth: grid.depth(),
            reason: "marching squares needs a planar grid",
        });
    }
    grid.dims().validate_for_cells()?;
    Ok(())
}

struct Square {
    values: [f32; SQUARE_CORNER_COUNT],
    corners: [Vec3; SQUARE_CORNER_COUNT],
}

impl Square {
    fn load(grid: &FieldGrid, x: usize, y: usize) -> Self {
        let samples = grid.samples();
        let mut values = [0.0; SQUARE_CORNER_COUNT];
        let mut corners = [Vec3::ZERO; SQUARE_CORNER_COUNT];
        for (i, c) in SQUARE_CORNERS.iter().enumerate() {
            let (cx, cy) = (x + c[0] as usize, y + c[1] as usize);
            values[i] = samples[grid.idx(cx, cy, 0)];
            corners[i] = grid.world_position(cx, cy, 0);
        }
        Self { values, corners }
    }

    fn edge_point(&self, e: usize, threshold: f32) -> Vec3 {
        let [a, b] = SQUARE_EDGES[e];
        let (a, b) = (a as usize, b as usize);
        interpolate_edge(
            self.corners[a],
            self.corners[b],
            self.values[a],
            self.values[b],
            threshold,
        )
    }
}

/// Isoline walls of height `wall_height` over the whole grid.
pub fn extract_contour(grid: &FieldGrid, threshold: f32, wall_height: f32) -> GenResult<Mesh> {
    require_planar(grid)?;
    if !(wall_height > 0.0 && wall_height.is_finite()) {
        return Err(GenError::invalid_parameter(
            "wall_height",
            format!("{wall_height} must be positive and finite"),
        ));
    }
    let t0 = Instant::now();
    let mut mesh = Mesh::new();
    extract_contour_cells(grid, threshold, wall_height, &CellRange::all(grid), &mut mesh);
    mesh.recalculate_normals();
    log::debug!(
        "marching squares contour {}x{}: {} segments in {:.2}ms",
        grid.width(),
        grid.height(),
        mesh.triangle_count() / 2,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(mesh)
}

/// Contour walls for `cells`, appended to `out` without normals.
///
/// Segments keep the above-threshold side on their left, so the quad
/// `A, A+h, B+h, B` faces the below-threshold side.
pub fn extract_contour_cells(
    grid: &FieldGrid,
    threshold: f32,
    wall_height: f32,
    cells: &CellRange,
    out: &mut Mesh,
) {
    let table = square_table();
    let extent = grid.extent();
    let lift = Vec3::UP * wall_height;
    for x in cells.x.clone() {
        for y in cells.y.clone() {
            let sq = Square::load(grid, x, y);
            let case = square_case_index(&sq.values, threshold);
            if table.entry(case).is_empty() {
                continue;
            }
            let mut cache: [Option<Vec3>; SQUARE_EDGE_COUNT] = [None; SQUARE_EDGE_COUNT];
            for seg in table.groups(case) {
                let mut ends = [Vec3::ZERO; 2];
                for (k, &e) in seg.iter().enumerate() {
                    let e = e as usize;
                    ends[k] = *cache[e].get_or_insert_with(|| sq.edge_point(e, threshold));
                }
                let [a, b] = ends;
                let (ta, tb) = (a + lift, b + lift);
                let ia = out.push_vertex(a, planar_uv(grid, extent, a));
                let ita = out.push_vertex(ta, planar_uv(grid, extent, ta));
                let itb = out.push_vertex(tb, planar_uv(grid, extent, tb));
                let ib = out.push_vertex(b, planar_uv(grid, extent, b));
                out.push_triangle(ia, ita, itb);
                out.push_triangle(ia, itb, ib);
            }
        }
    }
}

/// Above-threshold region triangulated on the ground plane, facing +Y.
pub fn extract_filled(grid: &FieldGrid, threshold: f32) -> GenResult<Mesh> {
    require_planar(grid)?;
    let table = square_fill_table();
    let extent = grid.extent();
    let mut mesh = Mesh::new();
    let cells = CellRange::all(grid);
    for x in cells.x.clone() {
        for y in cells.y.clone() {
            let sq = Square::load(grid, x, y);
            let case = square_case_index(&sq.values, threshold);
            if table.entry(case).is_empty() {
                continue;
            }
            let mut cache = [u32::MAX; SQUARE_FILL_POINTS];
            for tri in table.groups(case) {
                let mut ids = [0u32; 3];
                for (k, &pt) in tri.iter().enumerate() {
                    let pt = pt as usize;
                    if cache[pt] == u32::MAX {
                        let p = if pt < SQUARE_EDGE_COUNT {
                            sq.edge_point(pt, threshold)
                        } else {
                            sq.corners[pt - SQUARE_EDGE_COUNT]
                        };
                        cache[pt] = mesh.push_vertex(p, planar_uv(grid, extent, p));
                    }
                    ids[k] = cache[pt];
                }
                // Counter-clockwise in grid (x, y) turns downward once y maps to world z.
                mesh.push_triangle(ids[0], ids[2], ids[1]);
            }
        }
    }
    mesh.recalculate_normals();
    Ok(mesh)
}
