//! Shaped fractal variants built on [`FractalSampler`].

use strata_field::{FieldGrid, GenResult, GridDims};
use strata_geom::Vec3;

use crate::params::{PinkParams, TurbulenceParams};
use crate::perlin::FractalSampler;
use crate::synth::par_fill;

/// Octave frequency doubles for pink noise.
const PINK_LACUNARITY: f32 = 2.0;

/// Sum of absolute octave values over the amplitude sum; lands in `[0, 1]`.
pub(crate) fn generate_turbulence(p: &TurbulenceParams, dims: GridDims) -> GenResult<FieldGrid> {
    let sampler = FractalSampler::new(
        p.seed,
        Vec3::from_array(p.offset),
        p.octaves,
        p.persistence,
        p.lacunarity,
        p.scale,
        dims,
    );
    let max_amplitude = sampler.amplitude_sum();
    let samples = par_fill(dims, |x, y, z| {
        (sampler.accumulate(x, y, z, f32::abs) / max_amplitude).min(1.0)
    });
    FieldGrid::from_samples(dims, samples)
}

/// Octave-doubling fBm of unit-range Perlin, over the amplitude sum.
pub(crate) fn generate_pink(p: &PinkParams, dims: GridDims) -> GenResult<FieldGrid> {
    let sampler = FractalSampler::new(
        p.seed,
        Vec3::from_array(p.offset),
        p.octaves,
        p.persistence,
        PINK_LACUNARITY,
        p.scale,
        dims,
    );
    let max_amplitude = sampler.amplitude_sum();
    let samples = par_fill(dims, |x, y, z| {
        let sum = sampler.accumulate(x, y, z, |n| ((n + 1.0) * 0.5).clamp(0.0, 1.0));
        (sum / max_amplitude).min(1.0)
    });
    FieldGrid::from_samples(dims, samples)
}
