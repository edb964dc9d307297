use crate::error::{GenError, GenResult};
use crate::grid::{FieldGrid, GridDims};

impl FieldGrid {
    /// Lifts a planar height map into a volume density.
    ///
    /// The map's `(x, y)` becomes the volume's `(x, z)`. Each column is solid
    /// (1.0) below `amplitude * h - base_y`, empty (0.0) above it, with a
    /// one-sample linear ramp at the surface. `base_y` is the world-space row
    /// of the volume's first layer, so stacked volumes agree at their seams.
    pub fn from_heightmap(
        map: &FieldGrid,
        height: usize,
        amplitude: f32,
        base_y: f32,
    ) -> GenResult<FieldGrid> {
        if map.is_volume() {
            return Err(GenError::InvalidDimensions {
                width: map.width(),
                height: map.height(),
                depth: map.depth(),
                reason: "height map must be planar",
            });
        }
        let dims = GridDims::volume(map.width(), height, map.height());
        let grid = FieldGrid::from_fn(dims, |x, y, z| {
            (amplitude * map.get2(x, z) - (y as f32 + base_y)).clamp(0.0, 1.0)
        })?;
        Ok(grid
            .with_cell_size(map.cell_size())
            .with_origin(map.origin()))
    }
}
