use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use strata_field::{GenError, GenResult};
use strata_mesh_cpu::SliceAxis;
use strata_noise::{NoiseParameters, NormalizeMode, PerlinParams};

/// World description loaded from TOML.
///
/// Every table and field is optional; omitted values take the defaults below.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub chunks: ChunkLayout,
    #[serde(default)]
    pub source: Source,
    #[serde(default = "default_noise")]
    pub noise: NoiseParameters,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            chunks: ChunkLayout::default(),
            source: Source::default(),
            noise: default_noise(),
            runtime: RuntimeConfig::default(),
        }
    }
}

fn default_threshold() -> f32 {
    0.5
}

// Global normalization keeps neighbouring chunks on one scale.
fn default_noise() -> NoiseParameters {
    NoiseParameters::Perlin(PerlinParams {
        scale: 48.0,
        normalize: NormalizeMode::Global,
        ..Default::default()
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChunkLayout {
    /// Cells per chunk along x, y, z.
    #[serde(default = "default_chunk_size")]
    pub size: [usize; 3],
    /// Chunks along x, y, z.
    #[serde(default = "default_chunk_counts")]
    pub counts: [usize; 3],
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub origin: [f32; 3],
}
fn default_chunk_size() -> [usize; 3] {
    [32, 32, 32]
}
fn default_chunk_counts() -> [usize; 3] {
    [4, 1, 4]
}
fn default_cell_size() -> f32 {
    1.0
}
impl Default for ChunkLayout {
    fn default() -> Self {
        Self {
            size: default_chunk_size(),
            counts: default_chunk_counts(),
            cell_size: default_cell_size(),
            origin: [0.0; 3],
        }
    }
}

impl ChunkLayout {
    /// Samples spanned by the whole world along y.
    pub fn world_height(&self) -> usize {
        self.size[1] * self.counts[1]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Planar noise over x/z read as terrain height.
    #[default]
    Heightmap,
    /// Volumetric noise read directly as density. Kinds without a 3D sampler
    /// fall back to the height-map reading.
    Volume,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub mode: SourceMode,
    /// Height in samples reached by a height-map value of 1.0. Defaults to the
    /// world height.
    #[serde(default)]
    pub amplitude: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RuntimeConfig {
    /// Chunk workers; 0 picks the available parallelism.
    #[serde(default)]
    pub workers: usize,
    /// Threads meshing each chunk in slices; 0 meshes chunks sequentially.
    #[serde(default)]
    pub mesh_threads: usize,
    #[serde(default)]
    pub slice_axis: SliceAxis,
}
impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            mesh_threads: 0,
            slice_axis: SliceAxis::X,
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Height-map amplitude in samples.
    pub fn heightmap_amplitude(&self) -> f32 {
        self.source
            .amplitude
            .unwrap_or(self.chunks.world_height() as f32)
    }

    pub fn validate(&self) -> GenResult<()> {
        if !self.threshold.is_finite() {
            return Err(GenError::invalid_parameter(
                "threshold",
                format!("{} is not finite", self.threshold),
            ));
        }
        let [w, h, d] = self.chunks.size;
        if w == 0 || h == 0 || d == 0 {
            return Err(GenError::InvalidDimensions {
                width: w,
                height: h,
                depth: d,
                reason: "chunks need at least one cell per axis",
            });
        }
        let cs = self.chunks.cell_size;
        if !(cs > 0.0 && cs.is_finite()) {
            return Err(GenError::invalid_parameter(
                "cell_size",
                format!("{cs} must be positive and finite"),
            ));
        }
        if let Some(a) = self.source.amplitude {
            if !a.is_finite() {
                return Err(GenError::invalid_parameter(
                    "amplitude",
                    format!("{a} is not finite"),
                ));
            }
        }
        self.noise.validate()
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldConfig::from_toml_str(&s)
}
