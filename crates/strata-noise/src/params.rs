use serde::Deserialize;
use strata_field::{GenError, GenResult};
use strata_geom::Vec3;

/// Scale values at or below zero are replaced with this.
pub const SCALE_EPSILON: f32 = 1e-4;

/// Smallest blue-noise spacing, in samples. The output marks whole cells, so
/// closer spacing adds nothing but acceleration-grid memory.
pub const MIN_BLUE_NOISE_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    /// Rescale the observed `[min, max]` onto `[0, 1]`.
    #[default]
    Local,
    /// Divide by the theoretical amplitude sum and clamp below at zero.
    Global,
}

/// Noise algorithm plus its own parameters. Dispatched by [`crate::generate_2d`]
/// and [`crate::generate_3d`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseParameters {
    Random(RandomParams),
    Perlin(PerlinParams),
    Cellular(CellularParams),
    BlueNoise(BlueNoiseParams),
    Wavelet(WaveletParams),
    Turbulence(TurbulenceParams),
    Pink(PinkParams),
    Simplex(SimplexParams),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RandomParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
}

impl Default for RandomParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PerlinParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub normalize: NormalizeMode,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_scale(),
            normalize: NormalizeMode::Local,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CellularParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_cell_count")]
    pub cell_count_x: u32,
    #[serde(default = "default_cell_count")]
    pub cell_count_y: u32,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            cell_count_x: default_cell_count(),
            cell_count_y: default_cell_count(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BlueNoiseParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for BlueNoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            min_distance: default_min_distance(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaveletParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for WaveletParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TurbulenceParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for TurbulenceParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PinkParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for PinkParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            octaves: default_octaves(),
            persistence: default_persistence(),
            scale: default_scale(),
        }
    }
}

/// Fractal OpenSimplex2. Same octave layout as [`PerlinParams`]; `Global`
/// maps the raw sum through `(h + 1) / (2 * Σa)` clamped to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimplexParams {
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub normalize: NormalizeMode,
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self {
            seed: 0,
            offset: [0.0; 3],
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_scale(),
            normalize: NormalizeMode::Local,
        }
    }
}

fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_scale() -> f32 {
    24.0
}
fn default_cell_count() -> u32 {
    4
}
fn default_min_distance() -> f32 {
    4.0
}
fn default_max_attempts() -> u32 {
    30
}

/// `scale`, or [`SCALE_EPSILON`] when it is not positive.
#[inline]
pub(crate) fn effective_scale(scale: f32) -> f32 {
    if scale <= 0.0 { SCALE_EPSILON } else { scale }
}

fn check_octaves(octaves: u32) -> GenResult<()> {
    if octaves == 0 {
        return Err(GenError::invalid_parameter("octaves", "must be at least 1"));
    }
    Ok(())
}

fn check_persistence(persistence: f32) -> GenResult<()> {
    if !(persistence > 0.0 && persistence <= 1.0) {
        return Err(GenError::invalid_parameter(
            "persistence",
            format!("{persistence} is outside (0, 1]"),
        ));
    }
    Ok(())
}

fn check_lacunarity(lacunarity: f32) -> GenResult<()> {
    if !(lacunarity > 0.0) {
        return Err(GenError::invalid_parameter(
            "lacunarity",
            format!("{lacunarity} must be positive"),
        ));
    }
    Ok(())
}

impl NoiseParameters {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NoiseParameters::Random(_) => "random",
            NoiseParameters::Perlin(_) => "perlin",
            NoiseParameters::Cellular(_) => "cellular",
            NoiseParameters::BlueNoise(_) => "blue_noise",
            NoiseParameters::Wavelet(_) => "wavelet",
            NoiseParameters::Turbulence(_) => "turbulence",
            NoiseParameters::Pink(_) => "pink",
            NoiseParameters::Simplex(_) => "simplex",
        }
    }

    /// Kinds with a native 3D sampler. The rest are lifted from a planar map.
    pub fn is_volumetric(&self) -> bool {
        matches!(
            self,
            NoiseParameters::Random(_)
                | NoiseParameters::Perlin(_)
                | NoiseParameters::Turbulence(_)
                | NoiseParameters::Simplex(_)
        )
    }

    /// Copy with `delta` added to the sampling offset. Cellular offsets jitter
    /// feature points within their cells and blue noise has no offset, so both
    /// are returned unchanged.
    pub fn with_offset(&self, delta: Vec3) -> Self {
        fn shift(o: [f32; 3], d: Vec3) -> [f32; 3] {
            [o[0] + d.x, o[1] + d.y, o[2] + d.z]
        }
        let mut out = self.clone();
        match &mut out {
            NoiseParameters::Random(p) => p.offset = shift(p.offset, delta),
            NoiseParameters::Perlin(p) => p.offset = shift(p.offset, delta),
            NoiseParameters::Cellular(_) | NoiseParameters::BlueNoise(_) => {}
            NoiseParameters::Wavelet(p) => p.offset = shift(p.offset, delta),
            NoiseParameters::Turbulence(p) => p.offset = shift(p.offset, delta),
            NoiseParameters::Pink(p) => p.offset = shift(p.offset, delta),
            NoiseParameters::Simplex(p) => p.offset = shift(p.offset, delta),
        }
        out
    }

    /// Rejects parameter values the samplers cannot work with. `scale` is
    /// never an error; it is clamped at sampling time.
    pub fn validate(&self) -> GenResult<()> {
        match self {
            NoiseParameters::Random(_) => Ok(()),
            NoiseParameters::Perlin(p) => {
                check_octaves(p.octaves)?;
                check_persistence(p.persistence)?;
                check_lacunarity(p.lacunarity)
            }
            NoiseParameters::Cellular(p) => {
                if p.cell_count_x == 0 {
                    return Err(GenError::invalid_parameter("cell_count_x", "must be at least 1"));
                }
                if p.cell_count_y == 0 {
                    return Err(GenError::invalid_parameter("cell_count_y", "must be at least 1"));
                }
                Ok(())
            }
            NoiseParameters::BlueNoise(p) => {
                if !(p.min_distance >= MIN_BLUE_NOISE_DISTANCE && p.min_distance.is_finite()) {
                    return Err(GenError::invalid_parameter(
                        "min_distance",
                        format!("{} is below one sample or not finite", p.min_distance),
                    ));
                }
                if p.max_attempts == 0 {
                    return Err(GenError::invalid_parameter("max_attempts", "must be at least 1"));
                }
                Ok(())
            }
            NoiseParameters::Wavelet(p) => {
                check_octaves(p.octaves)?;
                check_persistence(p.persistence)?;
                check_lacunarity(p.lacunarity)
            }
            NoiseParameters::Turbulence(p) => {
                check_octaves(p.octaves)?;
                check_persistence(p.persistence)?;
                check_lacunarity(p.lacunarity)
            }
            NoiseParameters::Pink(p) => {
                check_octaves(p.octaves)?;
                check_persistence(p.persistence)
            }
            NoiseParameters::Simplex(p) => {
                check_octaves(p.octaves)?;
                check_persistence(p.persistence)?;
                check_lacunarity(p.lacunarity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_fills_defaults_per_kind() {
        let p: NoiseParameters = toml::from_str("kind = \"perlin\"\nseed = 7\n").unwrap();
        match p {
            NoiseParameters::Perlin(p) => {
                assert_eq!(p.seed, 7);
                assert_eq!(p.octaves, 4);
                assert_eq!(p.normalize, NormalizeMode::Local);
            }
            other => panic!("unexpected {other:?}"),
        }

        let c: NoiseParameters =
            toml::from_str("kind = \"cellular\"\ncell_count_x = 2\noffset = [0.5, 0.25, 0.0]\n")
                .unwrap();
        assert_eq!(
            c,
            NoiseParameters::Cellular(CellularParams {
                seed: 0,
                offset: [0.5, 0.25, 0.0],
                cell_count_x: 2,
                cell_count_y: 4,
            })
        );

        let b: NoiseParameters = toml::from_str("kind = \"blue_noise\"\nmin_distance = 2.5\n").unwrap();
        assert_eq!(b.kind_name(), "blue_noise");
    }

    #[test]
    fn zero_octaves_and_lacunarity_are_rejected() {
        let p = NoiseParameters::Perlin(PerlinParams {
            octaves: 0,
            ..Default::default()
        });
        assert!(matches!(
            p.validate(),
            Err(GenError::InvalidParameter { name: "octaves", .. })
        ));
        let p = NoiseParameters::Wavelet(WaveletParams {
            lacunarity: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            p.validate(),
            Err(GenError::InvalidParameter { name: "lacunarity", .. })
        ));
    }

    #[test]
    fn blue_noise_limits_are_checked() {
        let p = NoiseParameters::BlueNoise(BlueNoiseParams {
            min_distance: 0.0,
            ..Default::default()
        });
        assert!(p.validate().is_err());
        let p = NoiseParameters::BlueNoise(BlueNoiseParams {
            max_attempts: 0,
            ..Default::default()
        });
        assert!(matches!(
            p.validate(),
            Err(GenError::InvalidParameter { name: "max_attempts", .. })
        ));
    }

    #[test]
    fn sub_sample_blue_noise_spacing_is_rejected() {
        let p = NoiseParameters::BlueNoise(BlueNoiseParams {
            min_distance: 1e-4,
            ..Default::default()
        });
        assert!(matches!(
            p.validate(),
            Err(GenError::InvalidParameter { name: "min_distance", .. })
        ));
        let p = NoiseParameters::BlueNoise(BlueNoiseParams {
            min_distance: MIN_BLUE_NOISE_DISTANCE,
            ..Default::default()
        });
        assert!(p.validate().is_ok());
    }

    #[test]
    fn simplex_checks_its_octave_parameters() {
        let p: NoiseParameters =
            toml::from_str("kind = \"simplex\"\nnormalize = \"global\"\n").unwrap();
        assert_eq!(p.kind_name(), "simplex");
        assert!(p.is_volumetric());
        assert!(p.validate().is_ok());
        let p = NoiseParameters::Simplex(SimplexParams {
            persistence: 1.5,
            ..Default::default()
        });
        assert!(matches!(
            p.validate(),
            Err(GenError::InvalidParameter { name: "persistence", .. })
        ));
    }

    #[test]
    fn non_positive_scale_is_clamped_not_rejected() {
        let p = NoiseParameters::Perlin(PerlinParams {
            scale: -3.0,
            ..Default::default()
        });
        assert!(p.validate().is_ok());
        assert_eq!(effective_scale(-3.0), SCALE_EPSILON);
        assert_eq!(effective_scale(2.0), 2.0);
    }

    #[test]
    fn with_offset_shifts_without_touching_seed() {
        let p = NoiseParameters::Random(RandomParams {
            seed: 3,
            offset: [1.0, 2.0, 3.0],
        });
        let q = p.with_offset(Vec3::new(10.0, 0.0, -1.0));
        assert_eq!(
            q,
            NoiseParameters::Random(RandomParams {
                seed: 3,
                offset: [11.0, 2.0, 2.0],
            })
        );
    }
}
