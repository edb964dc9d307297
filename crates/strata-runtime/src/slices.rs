use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_field::{FieldGrid, GenError, GenResult};
use strata_mesh_cpu::{CellRange, Mesh, SliceAxis, extract_cells, extract_contour_cells};

/// Meshes every one-cell slice along `axis` as an independent task and
/// concatenates the slices in ascending order.
///
/// Each task builds its own mesh with indices starting at 0; the merge
/// rebases them by the running vertex count. The result does not depend on
/// the number of worker threads, and with `SliceAxis::X` it is identical to
/// sequential [`strata_mesh_cpu::extract`]. Runs on the current rayon pool.
pub fn extract_parallel(grid: &FieldGrid, threshold: f32, axis: SliceAxis) -> GenResult<Mesh> {
    grid.dims().validate_for_cells()?;
    let volume = grid.is_volume();
    let wall_height = grid.cell_size();
    if !volume && !(wall_height > 0.0 && wall_height.is_finite()) {
        return Err(GenError::invalid_parameter(
            "wall_height",
            format!("{wall_height} must be positive and finite"),
        ));
    }
    let slices = CellRange::slice_count(grid, axis);
    let parts: Vec<Mesh> = (0..slices)
        .into_par_iter()
        .map(|i| {
            let cells = CellRange::slice(grid, axis, i);
            let mut part = Mesh::new();
            if volume {
                extract_cells(grid, threshold, &cells, &mut part);
            } else {
                extract_contour_cells(grid, threshold, wall_height, &cells, &mut part);
            }
            part.recalculate_normals();
            part
        })
        .collect();
    Ok(Mesh::merge(&parts))
}

/// Dedicated rayon pool for slice-parallel extraction.
pub struct MeshingPool {
    pool: ThreadPool,
}

impl MeshingPool {
    /// Pool with `threads` workers; 0 lets rayon pick.
    pub fn with_threads(threads: usize) -> GenResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("strata-mesh-{i}"))
            .build()
            .map_err(|e| GenError::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn extract(&self, grid: &FieldGrid, threshold: f32, axis: SliceAxis) -> GenResult<Mesh> {
        self.pool
            .install(|| extract_parallel(grid, threshold, axis))
    }
}
