//! Shared constants for strata-mesh-cpu. Centralizes the case-table sizes.

// Cube topology
pub(crate) const CUBE_CORNER_COUNT: usize = 8;
pub(crate) const CUBE_EDGE_COUNT: usize = 12;
pub(crate) const CUBE_FACE_COUNT: usize = 6;
pub(crate) const CUBE_CASES: usize = 1 << CUBE_CORNER_COUNT; // 256 corner masks

// Square topology
pub(crate) const SQUARE_CORNER_COUNT: usize = 4;
pub(crate) const SQUARE_EDGE_COUNT: usize = 4;
pub(crate) const SQUARE_CASES: usize = 1 << SQUARE_CORNER_COUNT; // 16 corner masks
// Fill polygons reference edge crossings 0..4 and corners 4..8
pub(crate) const SQUARE_FILL_POINTS: usize = SQUARE_EDGE_COUNT + SQUARE_CORNER_COUNT;

// Entry group sizes
pub(crate) const TRIANGLE: usize = 3;
pub(crate) const SEGMENT: usize = 2;
