use std::collections::VecDeque;
use std::f32::consts::TAU;

use strata_field::{FieldGrid, GenResult, GridDims};
use strata_geom::Vec2;

use crate::params::{BlueNoiseParams, NoiseParameters};
use crate::rng::{seeded_rng, unit_f32};

/// Background acceleration grid: cells of `min_distance / sqrt(2)` hold at most
/// one accepted point, so a 5x5 neighbourhood covers every possible conflict.
struct AcceptGrid {
    cell: f32,
    cols: usize,
    rows: usize,
    slots: Vec<Option<usize>>,
}

impl AcceptGrid {
    fn new(width: f32, height: f32, min_distance: f32) -> Self {
        let cell = min_distance / std::f32::consts::SQRT_2;
        let cols = ((width / cell).ceil() as usize).max(1);
        let rows = ((height / cell).ceil() as usize).max(1);
        Self {
            cell,
            cols,
            rows,
            slots: vec![None; cols * rows],
        }
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let gx = ((p.x / self.cell) as usize).min(self.cols - 1);
        let gy = ((p.y / self.cell) as usize).min(self.rows - 1);
        (gx, gy)
    }

    fn insert(&mut self, p: Vec2, index: usize) {
        let (gx, gy) = self.cell_of(p);
        self.slots[gy * self.cols + gx] = Some(index);
    }

    fn is_clear(&self, p: Vec2, points: &[Vec2], min_distance_sq: f32) -> bool {
        let (gx, gy) = self.cell_of(p);
        let x0 = gx.saturating_sub(2);
        let y0 = gy.saturating_sub(2);
        let x1 = (gx + 2).min(self.cols - 1);
        let y1 = (gy + 2).min(self.rows - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(i) = self.slots[y * self.cols + x] {
                    if points[i].distance_sq(p) < min_distance_sq {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Serial dart throwing over `[0, width) × [0, height)`.
///
/// Proposals are drawn around the front of a FIFO frontier at a uniform angle
/// and a radius in `[min_distance, 2 * min_distance)`. A point is accepted only
/// if no accepted point lies closer than `min_distance`; accepted points join
/// the frontier immediately. A frontier point is retired after `max_attempts`
/// consecutive rejections.
///
/// `min_distance` must be at least [`crate::MIN_BLUE_NOISE_DISTANCE`].
pub fn sample_points(p: &BlueNoiseParams, width: usize, height: usize) -> GenResult<Vec<Vec2>> {
    NoiseParameters::BlueNoise(p.clone()).validate()?;
    let (w, h) = (width as f32, height as f32);
    let min_d = p.min_distance;
    let min_d_sq = min_d * min_d;
    let mut rng = seeded_rng(p.seed);
    let mut grid = AcceptGrid::new(w, h, min_d);

    let first = Vec2::new(unit_f32(&mut rng) * w, unit_f32(&mut rng) * h);
    let mut points = vec![first];
    grid.insert(first, 0);
    let mut frontier = VecDeque::from([0usize]);

    while let Some(&active) = frontier.front() {
        let base = points[active];
        let mut misses = 0;
        while misses < p.max_attempts {
            let angle = unit_f32(&mut rng) * TAU;
            let radius = min_d * (1.0 + unit_f32(&mut rng));
            let cand = Vec2::new(base.x + radius * angle.cos(), base.y + radius * angle.sin());
            let in_bounds = cand.x >= 0.0 && cand.x < w && cand.y >= 0.0 && cand.y < h;
            if in_bounds && grid.is_clear(cand, &points, min_d_sq) {
                let index = points.len();
                points.push(cand);
                grid.insert(cand, index);
                frontier.push_back(index);
                misses = 0;
            } else {
                misses += 1;
            }
        }
        frontier.pop_front();
    }
    log::trace!("blue noise accepted {} points in {}x{}", points.len(), width, height);
    Ok(points)
}

/// Binary field: 1.0 in every cell holding an accepted point.
pub(crate) fn generate(p: &BlueNoiseParams, dims: GridDims) -> GenResult<FieldGrid> {
    debug_assert!(!dims.is_volume());
    let (width, height) = (dims.width(), dims.height());
    let mut samples = vec![0.0f32; dims.len()];
    for pt in sample_points(p, width, height)? {
        let x = (pt.x as usize).min(width - 1);
        let y = (pt.y as usize).min(height - 1);
        samples[y * width + x] = 1.0;
    }
    FieldGrid::from_samples(dims, samples)
}
