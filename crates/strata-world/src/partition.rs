use std::iter::FusedIterator;

use strata_field::{GenError, GenResult};
use strata_geom::Vec3;

use crate::ChunkCoord;
use crate::config::WorldConfig;

/// Where one chunk sits in the world and which samples it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkDescriptor {
    pub coord: ChunkCoord,
    /// Position in partition order (x fastest, then y, then z).
    pub index: usize,
    /// World position of the chunk's first sample.
    pub origin: Vec3,
    /// Global sample index of the chunk's first sample.
    pub sample_offset: [i64; 3],
    pub cell_dims: [usize; 3],
    /// `cell_dims + 1`: one shared border sample per axis.
    pub sample_dims: [usize; 3],
}

impl ChunkDescriptor {
    pub fn sample_offset_vec(&self) -> Vec3 {
        Vec3::new(
            self.sample_offset[0] as f32,
            self.sample_offset[1] as f32,
            self.sample_offset[2] as f32,
        )
    }
}

/// Tiles a world box into `counts` chunks of `chunk_dims` cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkPartitioner {
    origin: Vec3,
    chunk_dims: [usize; 3],
    counts: [usize; 3],
    cell_size: f32,
}

impl ChunkPartitioner {
    pub fn new(origin: Vec3, chunk_dims: [usize; 3], counts: [usize; 3]) -> GenResult<Self> {
        if chunk_dims.contains(&0) {
            return Err(GenError::InvalidDimensions {
                width: chunk_dims[0],
                height: chunk_dims[1],
                depth: chunk_dims[2],
                reason: "chunks need at least one cell per axis",
            });
        }
        Ok(Self {
            origin,
            chunk_dims,
            counts,
            cell_size: 1.0,
        })
    }

    pub fn from_config(cfg: &WorldConfig) -> GenResult<Self> {
        Ok(Self::new(
            Vec3::from_array(cfg.chunks.origin),
            cfg.chunks.size,
            cfg.chunks.counts,
        )?
        .with_cell_size(cfg.chunks.cell_size))
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn len(&self) -> usize {
        self.counts.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    pub fn chunk_dims(&self) -> [usize; 3] {
        self.chunk_dims
    }

    /// Descriptor of the chunk at partition position `index`.
    pub fn descriptor(&self, index: usize) -> Option<ChunkDescriptor> {
        if index >= self.len() {
            return None;
        }
        let [nx, ny, _] = self.counts;
        let cx = index % nx;
        let cy = (index / nx) % ny;
        let cz = index / (nx * ny);
        let coord = ChunkCoord::new(cx as i32, cy as i32, cz as i32);
        let sample_offset = coord.sample_base(self.chunk_dims);
        let origin = self.origin
            + Vec3::new(
                sample_offset[0] as f32,
                sample_offset[1] as f32,
                sample_offset[2] as f32,
            ) * self.cell_size;
        let [w, h, d] = self.chunk_dims;
        Some(ChunkDescriptor {
            coord,
            index,
            origin,
            sample_offset,
            cell_dims: self.chunk_dims,
            sample_dims: [w + 1, h + 1, d + 1],
        })
    }

    /// Fresh pass over every chunk. Each call starts from the beginning.
    pub fn iter(&self) -> ChunkIter {
        ChunkIter {
            part: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &ChunkPartitioner {
    type Item = ChunkDescriptor;
    type IntoIter = ChunkIter;

    fn into_iter(self) -> ChunkIter {
        self.iter()
    }
}

/// Lazy sequence of chunk descriptors; descriptors are built on demand.
#[derive(Clone, Debug)]
pub struct ChunkIter {
    part: ChunkPartitioner,
    next: usize,
}

impl Iterator for ChunkIter {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<ChunkDescriptor> {
        let d = self.part.descriptor(self.next)?;
        self.next += 1;
        Some(d)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.part.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChunkIter {}
impl FusedIterator for ChunkIter {}

/// Chunks of `chunk_dims` cells covering `chunk_counts` chunks from
/// `world_origin`, with unit cells.
pub fn partition(
    world_origin: Vec3,
    chunk_dims: [usize; 3],
    chunk_counts: [usize; 3],
) -> GenResult<ChunkIter> {
    Ok(ChunkPartitioner::new(world_origin, chunk_dims, chunk_counts)?.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_varies_fastest() {
        let coords: Vec<_> = partition(Vec3::ZERO, [4, 4, 4], [2, 2, 2])
            .unwrap()
            .map(|d| (d.coord.cx, d.coord.cy, d.coord.cz))
            .collect();
        assert_eq!(
            coords,
            vec![
                (0, 0, 0),
                (1, 0, 0),
                (0, 1, 0),
                (1, 1, 0),
                (0, 0, 1),
                (1, 0, 1),
                (0, 1, 1),
                (1, 1, 1)
            ]
        );
    }

    #[test]
    fn origin_follows_cell_size() {
        let p = ChunkPartitioner::new(Vec3::new(1.0, 2.0, 3.0), [8, 4, 2], [3, 1, 1])
            .unwrap()
            .with_cell_size(0.5);
        let d = p.descriptor(2).unwrap();
        assert_eq!(d.sample_offset, [16, 0, 0]);
        assert_eq!(d.origin, Vec3::new(9.0, 2.0, 3.0));
        assert_eq!(d.sample_dims, [9, 5, 3]);
        assert!(p.descriptor(3).is_none());
    }

    #[test]
    fn zero_counts_give_empty_partition() {
        let p = ChunkPartitioner::new(Vec3::ZERO, [4, 4, 4], [3, 0, 2]).unwrap();
        assert!(p.is_empty());
        assert_eq!(p.iter().count(), 0);
    }

    #[test]
    fn zero_sized_chunks_are_rejected() {
        assert!(matches!(
            ChunkPartitioner::new(Vec3::ZERO, [4, 0, 4], [1, 1, 1]),
            Err(GenError::InvalidDimensions { .. })
        ));
    }
}
