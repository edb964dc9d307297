//! World layout: chunk partitioning, per-chunk generation and the TOML world
//! configuration.
#![forbid(unsafe_code)]

mod chunk;
mod chunk_coord;
pub mod config;
mod partition;
mod world;

pub use chunk::{Chunk, generate_chunk, sample_chunk};
pub use chunk_coord::ChunkCoord;
pub use config::{WorldConfig, load_config_from_path};
pub use partition::{ChunkDescriptor, ChunkIter, ChunkPartitioner, partition};
pub use world::World;
