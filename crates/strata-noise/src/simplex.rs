use rayon::prelude::*;
use strata_field::{FieldGrid, GenResult, GridDims};
use strata_geom::Vec3;

use crate::params::{NormalizeMode, SimplexParams};
use crate::perlin::FractalSampler;
use crate::rng::simplex_source;
use crate::synth::{par_fill, par_normalize_local};

fn sampler(p: &SimplexParams, dims: GridDims) -> FractalSampler {
    FractalSampler::new(
        p.seed,
        Vec3::from_array(p.offset),
        p.octaves,
        p.persistence,
        p.lacunarity,
        p.scale,
        dims,
    )
    .with_noise(simplex_source(p.seed))
}

pub(crate) fn generate(p: &SimplexParams, dims: GridDims) -> GenResult<FieldGrid> {
    let sampler = sampler(p, dims);
    let mut samples = par_fill(dims, |x, y, z| sampler.accumulate(x, y, z, |n| n));
    match p.normalize {
        NormalizeMode::Local => par_normalize_local(&mut samples),
        NormalizeMode::Global => {
            let span = 2.0 * sampler.amplitude_sum();
            samples
                .par_iter_mut()
                .for_each(|v| *v = ((*v + 1.0) / span).clamp(0.0, 1.0));
        }
    }
    FieldGrid::from_samples(dims, samples)
}
