use strata_field::{FieldGrid, GenResult, GridDims};

use crate::params::{WaveletParams, effective_scale};
use crate::rng::{seeded_rng, unit_f32};
use crate::synth::{par_fill, par_normalize_local};

/// Upper bound of the seed-derived sample shift.
const WAVELET_OFFSET_RANGE: f32 = 1000.0;

/// Integer lattice hash in roughly `[-1, 1]`. Pure function of the coordinates.
#[inline]
pub fn lattice_hash(x: i32, y: i32) -> f32 {
    let n = x.wrapping_add(y.wrapping_mul(57));
    let n = (n << 13) ^ n;
    let m = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15_731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589);
    1.0 - (m & 0x7fff_ffff) as f32 / 1_073_741_824.0
}

/// Tent kernel with support `(-1, 1)`.
#[inline]
fn tent(t: f32) -> f32 {
    let t = t.abs();
    if t < 1.0 { 1.0 - t } else { 0.0 }
}

/// Tent-weighted blend of the four lattice values around `(x, y)`.
pub fn wavelet_point(x: f32, y: f32) -> f32 {
    let xf = x.floor();
    let yf = y.floor();
    let (x0, y0) = (xf as i32, yf as i32);
    let (wx, wy) = (x - xf, y - yf);
    tent(wx) * tent(wy) * lattice_hash(x0, y0)
        + tent(wx - 1.0) * tent(wy) * lattice_hash(x0.wrapping_add(1), y0)
        + tent(wx) * tent(wy - 1.0) * lattice_hash(x0, y0.wrapping_add(1))
        + tent(wx - 1.0) * tent(wy - 1.0) * lattice_hash(x0.wrapping_add(1), y0.wrapping_add(1))
}

pub(crate) fn generate(p: &WaveletParams, dims: GridDims) -> GenResult<FieldGrid> {
    debug_assert!(!dims.is_volume());
    let mut rng = seeded_rng(p.seed);
    let ox = unit_f32(&mut rng) * WAVELET_OFFSET_RANGE + p.offset[0];
    let oy = unit_f32(&mut rng) * WAVELET_OFFSET_RANGE + p.offset[1];
    let scale = effective_scale(p.scale);
    let (octaves, persistence, lacunarity) = (p.octaves, p.persistence, p.lacunarity);

    let mut samples = par_fill(dims, |x, y, _| {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut value = 0.0;
        for _ in 0..octaves {
            let sx = (x as f32 + ox) / scale * frequency;
            let sy = (y as f32 + oy) / scale * frequency;
            value += wavelet_point(sx, sy) * amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        value
    });
    par_normalize_local(&mut samples);
    FieldGrid::from_samples(dims, samples)
}
