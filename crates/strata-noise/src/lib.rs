//! Seeded scalar-field samplers.
//!
//! Every kind is a pure function of its parameters and the requested extent:
//! a fresh RNG is seeded inside each call and per-octave offsets are drawn
//! before any sample is evaluated. Grids are synthesized row-parallel.
#![forbid(unsafe_code)]

mod blue;
mod cellular;
mod params;
mod perlin;
mod random;
pub mod rng;
mod simplex;
mod synth;
mod turbulence;
mod wavelet;

use std::time::Instant;

use strata_field::{FieldGrid, GenResult, GridDims};

pub use blue::sample_points as blue_noise_points;
pub use cellular::CellularLayout;
pub use params::{
    BlueNoiseParams, CellularParams, NoiseParameters, NormalizeMode, PerlinParams, PinkParams,
    MIN_BLUE_NOISE_DISTANCE, RandomParams, SCALE_EPSILON, SimplexParams, TurbulenceParams,
    WaveletParams,
};
pub use perlin::FractalSampler;
pub use random::RANDOM_SAMPLE_SPACING;
pub use wavelet::{lattice_hash, wavelet_point};

fn synthesize(params: &NoiseParameters, dims: GridDims) -> GenResult<FieldGrid> {
    match params {
        NoiseParameters::Random(p) => random::generate(p, dims),
        NoiseParameters::Perlin(p) => perlin::generate(p, dims),
        NoiseParameters::Cellular(p) => cellular::generate(p, dims),
        NoiseParameters::BlueNoise(p) => blue::generate(p, dims),
        NoiseParameters::Wavelet(p) => wavelet::generate(p, dims),
        NoiseParameters::Turbulence(p) => turbulence::generate_turbulence(p, dims),
        NoiseParameters::Pink(p) => turbulence::generate_pink(p, dims),
        NoiseParameters::Simplex(p) => simplex::generate(p, dims),
    }
}

/// Planar `width × height` field.
pub fn generate_2d(params: &NoiseParameters, width: usize, height: usize) -> GenResult<FieldGrid> {
    let dims = GridDims::planar(width, height).validate()?;
    params.validate()?;
    let t0 = Instant::now();
    let grid = synthesize(params, dims)?;
    log::debug!(
        "noise {} {}x{} in {:.2}ms",
        params.kind_name(),
        width,
        height,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(grid)
}

/// Volumetric `width × height × depth` field.
///
/// Random, Perlin, simplex and turbulence sample natively in 3D. The planar-only kinds
/// generate a `width × depth` map and lift it into a height-field density
/// spanning the full volume height.
pub fn generate_3d(
    params: &NoiseParameters,
    width: usize,
    height: usize,
    depth: usize,
) -> GenResult<FieldGrid> {
    let dims = GridDims::volume(width, height, depth).validate()?;
    params.validate()?;
    if !params.is_volumetric() {
        let map = generate_2d(params, width, depth)?;
        let amplitude = height.saturating_sub(1) as f32;
        return FieldGrid::from_heightmap(&map, height, amplitude, 0.0);
    }
    let t0 = Instant::now();
    let grid = synthesize(params, dims)?;
    log::debug!(
        "noise {} {}x{}x{} in {:.2}ms",
        params.kind_name(),
        width,
        height,
        depth,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(grid)
}
