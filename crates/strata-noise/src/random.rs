use strata_field::{FieldGrid, GenResult, GridDims};
use strata_geom::Vec3;

use crate::params::RandomParams;
use crate::rng::{octave_offsets, perlin_source, seeded_rng};
use crate::synth::par_fill;

/// Grid spacing in lattice units. Irrational-ish so samples never land on
/// lattice points, where Perlin noise is exactly zero.
pub const RANDOM_SAMPLE_SPACING: f32 = 0.539;

/// One unscaled Perlin sample per cell, shifted by a seed-derived jitter and
/// remapped to `[0, 1]`.
pub(crate) fn generate(p: &RandomParams, dims: GridDims) -> GenResult<FieldGrid> {
    let mut rng = seeded_rng(p.seed);
    let jitter = octave_offsets(&mut rng, 1, Vec3::from_array(p.offset))[0];
    let noise = perlin_source(p.seed);
    let volume = dims.is_volume();
    let samples = par_fill(dims, |x, y, z| {
        let sx = (x as f32 + jitter.x) / RANDOM_SAMPLE_SPACING;
        let sy = (y as f32 + jitter.y) / RANDOM_SAMPLE_SPACING;
        let n = if volume {
            let sz = (z as f32 + jitter.z) / RANDOM_SAMPLE_SPACING;
            noise.get_noise_3d(sx, sy, sz)
        } else {
            noise.get_noise_2d(sx, sy)
        };
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    });
    FieldGrid::from_samples(dims, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_unit_range_and_seed_dependent() {
        let dims = GridDims::planar(16, 16);
        let a = generate(&RandomParams { seed: 1, ..Default::default() }, dims).unwrap();
        let b = generate(&RandomParams { seed: 2, ..Default::default() }, dims).unwrap();
        assert!(a.samples().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_ne!(a, b);
    }
}
