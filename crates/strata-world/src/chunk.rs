use std::time::Instant;

use strata_field::{FieldGrid, GenResult};
use strata_geom::Vec3;
use strata_mesh_cpu::{Mesh, extract};
use strata_noise::{generate_2d, generate_3d};

use crate::config::{SourceMode, WorldConfig};
use crate::partition::ChunkDescriptor;

/// One generated chunk. Owns its samples and mesh outright.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub desc: ChunkDescriptor,
    pub field: FieldGrid,
    pub mesh: Mesh,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Samples the density field of one chunk, including its border samples.
///
/// Noise is evaluated at the chunk's global sample offset, so chunks agree on
/// shared border samples whenever the noise kind is translation-consistent
/// (Perlin with global normalization, simplex, turbulence, random).
///
/// Kinds without a 3D sampler take the height-map path in volume mode too, so
/// vertically stacked chunks continue one column instead of repeating it.
pub fn sample_chunk(desc: &ChunkDescriptor, cfg: &WorldConfig) -> GenResult<FieldGrid> {
    let [w, h, d] = desc.sample_dims;
    let [ox, oy, oz] = desc.sample_offset;
    let volumetric = cfg.source.mode == SourceMode::Volume && cfg.noise.is_volumetric();
    let field = if volumetric {
        let params = cfg.noise.with_offset(desc.sample_offset_vec());
        generate_3d(&params, w, h, d)?
    } else {
        // Planar noise uses (x, y); the chunk's z axis plays y.
        let params = cfg.noise.with_offset(Vec3::new(ox as f32, oz as f32, 0.0));
        let map = generate_2d(&params, w, d)?;
        FieldGrid::from_heightmap(&map, h, cfg.heightmap_amplitude(), oy as f32)?
    };
    Ok(field
        .with_cell_size(cfg.chunks.cell_size)
        .with_origin(desc.origin))
}

/// Samples and meshes one chunk on the calling thread.
pub fn generate_chunk(desc: &ChunkDescriptor, cfg: &WorldConfig) -> GenResult<Chunk> {
    let t0 = Instant::now();
    let field = sample_chunk(desc, cfg)?;
    let t_gen = t0.elapsed();
    let mesh = extract(&field, cfg.threshold)?;
    log::debug!(
        "chunk {} gen {:.2}ms mesh {:.2}ms: {} tris",
        desc.coord,
        t_gen.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_gen).as_secs_f64() * 1000.0,
        mesh.triangle_count()
    );
    Ok(Chunk {
        desc: desc.clone(),
        field,
        mesh,
    })
}
