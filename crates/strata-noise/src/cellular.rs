use strata_field::{FieldGrid, GenError, GenResult, GridDims};
use strata_geom::Vec2;

use crate::params::CellularParams;
use crate::rng::{seeded_rng, unit_f32};
use crate::synth::par_fill;

/// Fixed-capacity ascending selection of the three smallest distances.
#[derive(Clone, Copy, Debug)]
struct NearestThree {
    d: [f32; 3],
    len: usize,
}

impl NearestThree {
    fn new() -> Self {
        Self {
            d: [f32::INFINITY; 3],
            len: 0,
        }
    }

    fn push(&mut self, v: f32) {
        if self.len == 3 && v >= self.d[2] {
            return;
        }
        let mut i = self.len.min(2);
        self.d[i] = v;
        while i > 0 && self.d[i - 1] > self.d[i] {
            self.d.swap(i - 1, i);
            i -= 1;
        }
        self.len = (self.len + 1).min(3);
    }

    /// `min(d0, d1) / max(d0, d1)` of the two closest; zero when both are zero.
    fn ratio(&self) -> f32 {
        let (d0, d1) = (self.d[0], self.d[1]);
        if d1 > 0.0 { d0 / d1 } else { 0.0 }
    }
}

/// Jittered feature points for a `count_x × count_y` cell partition plus a
/// one-cell border ring, so edge samples see all eight neighbours.
#[derive(Clone, Debug)]
pub struct CellularLayout {
    cell_w: usize,
    cell_h: usize,
    count_x: usize,
    count_y: usize,
    points: Vec<Vec2>,
}

impl CellularLayout {
    pub fn new(p: &CellularParams, width: usize, height: usize) -> GenResult<Self> {
        let count_x = p.cell_count_x as usize;
        let count_y = p.cell_count_y as usize;
        if count_x == 0 || count_x > width {
            return Err(GenError::invalid_parameter(
                "cell_count_x",
                format!("{count_x} cells do not fit a width of {width}"),
            ));
        }
        if count_y == 0 || count_y > height {
            return Err(GenError::invalid_parameter(
                "cell_count_y",
                format!("{count_y} cells do not fit a height of {height}"),
            ));
        }
        let cell_w = width / count_x;
        let cell_h = height / count_y;
        let stride = count_x + 2;
        let mut points = vec![Vec2::ZERO; stride * (count_y + 2)];
        let mut rng = seeded_rng(p.seed);
        for bx in 0..stride {
            for by in 0..count_y + 2 {
                let jx = (cell_w as f32 * (unit_f32(&mut rng) + p.offset[0])).round();
                let jy = (cell_h as f32 * (unit_f32(&mut rng) + p.offset[1])).round();
                let cx = bx as f32 - 1.0;
                let cy = by as f32 - 1.0;
                points[by * stride + bx] =
                    Vec2::new(cell_w as f32 * cx + jx, cell_h as f32 * cy + jy);
            }
        }
        Ok(Self {
            cell_w,
            cell_h,
            count_x,
            count_y,
            points,
        })
    }

    /// Feature point of cell `(cx, cy)`, where `-1` and `count` are border cells.
    pub fn feature_point(&self, cx: i32, cy: i32) -> Vec2 {
        let bx = (cx + 1) as usize;
        let by = (cy + 1) as usize;
        self.points[by * (self.count_x + 2) + bx]
    }

    /// Interior cell containing sample `(x, y)`. Samples past the last whole
    /// cell belong to the last cell.
    pub fn cell_of(&self, x: usize, y: usize) -> (i32, i32) {
        let cx = (x / self.cell_w).min(self.count_x - 1);
        let cy = (y / self.cell_h).min(self.count_y - 1);
        (cx as i32, cy as i32)
    }

    pub fn value_at(&self, x: usize, y: usize) -> f32 {
        let p = Vec2::new(x as f32, y as f32);
        let (cx, cy) = self.cell_of(x, y);
        let mut nearest = NearestThree::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                nearest.push(p.distance_sq(self.feature_point(cx + dx, cy + dy)));
            }
        }
        nearest.ratio()
    }
}

pub(crate) fn generate(p: &CellularParams, dims: GridDims) -> GenResult<FieldGrid> {
    debug_assert!(!dims.is_volume());
    let layout = CellularLayout::new(p, dims.width(), dims.height())?;
    let samples = par_fill(dims, |x, y, _| layout.value_at(x, y));
    FieldGrid::from_samples(dims, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_three_keeps_smallest_sorted() {
        let mut n = NearestThree::new();
        for v in [9.0, 4.0, 7.0, 1.0, 8.0, 2.0] {
            n.push(v);
        }
        assert_eq!(n.d, [1.0, 2.0, 4.0]);
        assert_eq!(n.ratio(), 0.5);
    }

    #[test]
    fn ratio_of_two_zeros_is_zero() {
        let mut n = NearestThree::new();
        n.push(0.0);
        n.push(0.0);
        assert_eq!(n.ratio(), 0.0);
    }

    #[test]
    fn too_many_cells_is_rejected() {
        let p = CellularParams {
            cell_count_x: 9,
            ..Default::default()
        };
        assert!(matches!(
            CellularLayout::new(&p, 8, 8),
            Err(GenError::InvalidParameter { name: "cell_count_x", .. })
        ));
    }

    #[test]
    fn trailing_samples_clamp_to_last_cell() {
        let p = CellularParams {
            cell_count_x: 3,
            cell_count_y: 3,
            ..Default::default()
        };
        let layout = CellularLayout::new(&p, 10, 10).unwrap();
        assert_eq!(layout.cell_of(9, 9), (2, 2));
        assert_eq!(layout.cell_of(0, 3), (0, 1));
    }

    #[test]
    fn values_are_unit_range() {
        let p = CellularParams {
            seed: 21,
            ..Default::default()
        };
        let g = generate(&p, GridDims::planar(33, 17)).unwrap();
        assert!(g.samples().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
