//! Dense scalar sample grids and the error taxonomy shared across the pipeline.
#![forbid(unsafe_code)]

mod error;
mod grid;
mod heightmap;
mod resample;

pub use error::{GenError, GenResult};
pub use grid::{FieldGrid, GridDims, inverse_lerp};
