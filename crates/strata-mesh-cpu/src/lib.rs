//! CPU isosurface extraction: case tables, mesh buffers, marching cubes and
//! marching squares (engine-only).
#![forbid(unsafe_code)]

mod constants;
mod contour;
mod extract;
mod mesh;
pub mod tables;

pub use contour::{extract_contour, extract_contour_cells, extract_filled};
pub use extract::{
    CellRange, SliceAxis, extract, extract_cells, extract_volume, interpolate_edge,
};
pub use mesh::Mesh;
pub use tables::{CaseTable, cube_case_index, cube_table, square_fill_table, square_table};
