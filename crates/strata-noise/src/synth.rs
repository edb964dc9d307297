//! Row-parallel sample synthesis. Each rayon task owns a disjoint row of the
//! output, so values never depend on scheduling.

use rayon::prelude::*;
use strata_field::{GridDims, inverse_lerp};

const REDUCE_CHUNK: usize = 4096;

/// Evaluates `f(x, y, z)` for every sample. `f` must be pure.
pub(crate) fn par_fill<F>(dims: GridDims, f: F) -> Vec<f32>
where
    F: Fn(usize, usize, usize) -> f32 + Sync,
{
    let w = dims.width();
    let h = dims.height();
    let mut samples = vec![0.0f32; dims.len()];
    samples
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(row, out)| {
            let y = row % h;
            let z = row / h;
            for (x, v) in out.iter_mut().enumerate() {
                *v = f(x, y, z);
            }
        });
    samples
}

/// Observed `(min, max)` using per-task accumulators.
pub(crate) fn par_min_max(samples: &[f32]) -> (f32, f32) {
    let init = || (f32::INFINITY, f32::NEG_INFINITY);
    samples
        .par_chunks(REDUCE_CHUNK)
        .map(|chunk| {
            chunk
                .iter()
                .fold(init(), |(lo, hi), &v| (lo.min(v), hi.max(v)))
        })
        .reduce(init, |a, b| (a.0.min(b.0), a.1.max(b.1)))
}

/// Second pass of local normalization: observed range onto `[0, 1]`.
pub(crate) fn par_normalize_local(samples: &mut [f32]) {
    let (lo, hi) = par_min_max(samples);
    samples
        .par_iter_mut()
        .for_each(|v| *v = inverse_lerp(lo, hi, *v));
}
