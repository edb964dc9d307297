//! Seed plumbing. Every generation call builds its own RNG; nothing here is global.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_geom::Vec3;

/// Half-width of the integer jitter applied to each octave's sample origin.
pub const OFFSET_RANGE: i32 = 100_000;

pub fn seeded_rng(seed: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Folds a 64-bit seed into the 32-bit seed the lattice noise takes.
#[inline]
pub fn lattice_seed(seed: i64) -> i32 {
    (seed ^ (seed >> 32)) as i32
}

/// Unit-frequency Perlin lattice noise in `[-1, 1]`.
pub fn perlin_source(seed: i64) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(lattice_seed(seed));
    noise.set_noise_type(Some(NoiseType::Perlin));
    noise.set_frequency(Some(1.0));
    noise
}

/// Unit-frequency OpenSimplex2 lattice noise in `[-1, 1]`.
pub fn simplex_source(seed: i64) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(lattice_seed(seed));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(1.0));
    noise
}

/// One sample origin per octave: integer jitter in `[-OFFSET_RANGE, OFFSET_RANGE)`
/// plus the caller's offset. Draws are made in octave order before any sampling.
pub fn octave_offsets(rng: &mut ChaCha8Rng, octaves: u32, offset: Vec3) -> Vec<Vec3> {
    (0..octaves)
        .map(|_| {
            let jx = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f32;
            let jy = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f32;
            let jz = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f32;
            Vec3::new(jx, jy, jz) + offset
        })
        .collect()
}

/// Uniform draw in `[0, 1)`.
#[inline]
pub fn unit_f32(rng: &mut ChaCha8Rng) -> f32 {
    rng.gen_range(0.0f32..1.0)
}
