use fastnoise_lite::FastNoiseLite;
use rayon::prelude::*;
use strata_field::{FieldGrid, GenResult, GridDims};
use strata_geom::Vec3;

use crate::params::{NormalizeMode, PerlinParams, effective_scale};
use crate::rng::{octave_offsets, perlin_source, seeded_rng};
use crate::synth::{par_fill, par_normalize_local};

/// Multi-octave lattice evaluator shared by the Perlin, simplex, turbulence
/// and pink kinds. Perlin is the default source.
///
/// Octave `i` samples lattice noise at
/// `(p - half + offset_i) / scale * lacunarity^i`, weighted by `persistence^i`.
/// `half` centres the pattern on the grid so changing `scale` zooms about the
/// middle rather than the corner.
pub struct FractalSampler {
    noise: FastNoiseLite,
    offsets: Vec<Vec3>,
    persistence: f32,
    lacunarity: f32,
    scale: f32,
    half: Vec3,
    volume: bool,
}

impl FractalSampler {
    pub fn new(
        seed: i64,
        offset: Vec3,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
        scale: f32,
        dims: GridDims,
    ) -> Self {
        let mut rng = seeded_rng(seed);
        let offsets = octave_offsets(&mut rng, octaves, offset);
        let half = Vec3::new(
            dims.width() as f32 / 2.0,
            dims.height() as f32 / 2.0,
            if dims.is_volume() {
                dims.depth() as f32 / 2.0
            } else {
                0.0
            },
        );
        Self {
            noise: perlin_source(seed),
            offsets,
            persistence,
            lacunarity,
            scale: effective_scale(scale),
            half,
            volume: dims.is_volume(),
        }
    }

    /// Same octave layout over a different lattice source.
    pub fn with_noise(mut self, noise: FastNoiseLite) -> Self {
        self.noise = noise;
        self
    }

    /// Theoretical maximum of the weighted octave sum.
    pub fn amplitude_sum(&self) -> f32 {
        let mut amplitude = 1.0;
        let mut sum = 0.0;
        for _ in &self.offsets {
            sum += amplitude;
            amplitude *= self.persistence;
        }
        sum
    }

    /// Weighted sum of `shape(noise)` over all octaves at grid point `(x, y, z)`.
    #[inline]
    pub fn accumulate(&self, x: usize, y: usize, z: usize, shape: impl Fn(f32) -> f32) -> f32 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        for off in &self.offsets {
            let sx = (x as f32 - self.half.x + off.x) / self.scale * frequency;
            let sy = (y as f32 - self.half.y + off.y) / self.scale * frequency;
            let n = if self.volume {
                let sz = (z as f32 - self.half.z + off.z) / self.scale * frequency;
                self.noise.get_noise_3d(sx, sy, sz)
            } else {
                self.noise.get_noise_2d(sx, sy)
            };
            total += shape(n) * amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        total
    }
}

pub(crate) fn generate(p: &PerlinParams, dims: GridDims) -> GenResult<FieldGrid> {
    let sampler = FractalSampler::new(
        p.seed,
        Vec3::from_array(p.offset),
        p.octaves,
        p.persistence,
        p.lacunarity,
        p.scale,
        dims,
    );
    let mut samples = par_fill(dims, |x, y, z| sampler.accumulate(x, y, z, |n| n));
    match p.normalize {
        NormalizeMode::Local => par_normalize_local(&mut samples),
        NormalizeMode::Global => {
            let max_possible = sampler.amplitude_sum();
            samples
                .par_iter_mut()
                .for_each(|v| *v = ((*v + 1.0) / max_possible).max(0.0));
        }
    }
    FieldGrid::from_samples(dims, samples)
}
