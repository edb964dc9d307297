use strata_geom::Vec3;

use crate::error::{GenError, GenResult};

/// Extent of a sample grid. Planar grids lie in the world XZ plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridDims {
    Planar {
        width: usize,
        height: usize,
    },
    Volume {
        width: usize,
        height: usize,
        depth: usize,
    },
}

impl GridDims {
    #[inline]
    pub const fn planar(width: usize, height: usize) -> Self {
        GridDims::Planar { width, height }
    }

    #[inline]
    pub const fn volume(width: usize, height: usize, depth: usize) -> Self {
        GridDims::Volume {
            width,
            height,
            depth,
        }
    }

    #[inline]
    pub fn width(self) -> usize {
        match self {
            GridDims::Planar { width, .. } | GridDims::Volume { width, .. } => width,
        }
    }

    #[inline]
    pub fn height(self) -> usize {
        match self {
            GridDims::Planar { height, .. } | GridDims::Volume { height, .. } => height,
        }
    }

    /// Planar grids report a depth of 1.
    #[inline]
    pub fn depth(self) -> usize {
        match self {
            GridDims::Planar { .. } => 1,
            GridDims::Volume { depth, .. } => depth,
        }
    }

    #[inline]
    pub fn is_volume(self) -> bool {
        matches!(self, GridDims::Volume { .. })
    }

    #[inline]
    pub fn len(self) -> usize {
        self.width() * self.height() * self.depth()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    fn invalid(self, reason: &'static str) -> GenError {
        GenError::InvalidDimensions {
            width: self.width(),
            height: self.height(),
            depth: self.depth(),
            reason,
        }
    }

    /// Every axis must hold at least one sample.
    pub fn validate(self) -> GenResult<Self> {
        if self.is_empty() {
            return Err(self.invalid("every axis needs at least one sample"));
        }
        Ok(self)
    }

    /// Extraction needs two samples per axis to form a cell.
    pub fn validate_for_cells(self) -> GenResult<Self> {
        let short = self.width() < 2
            || self.height() < 2
            || (self.is_volume() && self.depth() < 2);
        if short {
            return Err(self.invalid("extraction needs at least two samples per axis"));
        }
        Ok(self)
    }
}

/// Dense, immutable scalar samples with a grid-to-world mapping.
///
/// Samples are stored x-fastest: `idx = (z * height + y) * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGrid {
    dims: GridDims,
    cell_size: f32,
    origin: Vec3,
    samples: Vec<f32>,
}

impl FieldGrid {
    /// Zero-filled grid with unit cells at the world origin.
    pub fn new(dims: GridDims) -> GenResult<Self> {
        let dims = dims.validate()?;
        Ok(Self {
            dims,
            cell_size: 1.0,
            origin: Vec3::ZERO,
            samples: vec![0.0; dims.len()],
        })
    }

    pub fn from_samples(dims: GridDims, samples: Vec<f32>) -> GenResult<Self> {
        let dims = dims.validate()?;
        if samples.len() != dims.len() {
            return Err(dims.invalid("sample count does not match dimensions"));
        }
        Ok(Self {
            dims,
            cell_size: 1.0,
            origin: Vec3::ZERO,
            samples,
        })
    }

    pub fn from_fn(
        dims: GridDims,
        mut f: impl FnMut(usize, usize, usize) -> f32,
    ) -> GenResult<Self> {
        let dims = dims.validate()?;
        let mut samples = Vec::with_capacity(dims.len());
        for z in 0..dims.depth() {
            for y in 0..dims.height() {
                for x in 0..dims.width() {
                    samples.push(f(x, y, z));
                }
            }
        }
        Self::from_samples(dims, samples)
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.dims.depth()
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.dims.is_volume()
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.dims.height() + y) * self.dims.width() + x
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.dims.width() && y < self.dims.height() && z < self.dims.depth()
    }

    pub fn try_get(&self, x: usize, y: usize, z: usize) -> GenResult<f32> {
        if !self.contains(x, y, z) {
            return Err(GenError::OutOfBoundsSample {
                x,
                y,
                z,
                width: self.dims.width(),
                height: self.dims.height(),
                depth: self.dims.depth(),
            });
        }
        Ok(self.samples[self.idx(x, y, z)])
    }

    /// Sample at `(x, y, z)`; panics when the index leaves the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        match self.try_get(x, y, z) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    #[inline]
    pub fn get2(&self, x: usize, y: usize) -> f32 {
        self.get(x, y, 0)
    }

    /// World position of a sample. Planar grids map `(x, y)` to world `(x, 0, y)`.
    #[inline]
    pub fn world_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        let cs = self.cell_size;
        let local = if self.dims.is_volume() {
            Vec3::new(x as f32 * cs, y as f32 * cs, z as f32 * cs)
        } else {
            Vec3::new(x as f32 * cs, 0.0, y as f32 * cs)
        };
        self.origin + local
    }

    /// World-space size spanned by the samples.
    pub fn extent(&self) -> Vec3 {
        let cs = self.cell_size;
        let w = (self.width() - 1) as f32 * cs;
        let h = (self.height() - 1) as f32 * cs;
        if self.is_volume() {
            Vec3::new(w, h, (self.depth() - 1) as f32 * cs)
        } else {
            Vec3::new(w, 0.0, h)
        }
    }

    /// Observed `(min, max)` over all samples.
    pub fn min_max(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Copy rescaled so the observed range maps onto `[0, 1]`.
    ///
    /// A flat field maps to all zeros.
    pub fn normalized_local(&self) -> FieldGrid {
        let (lo, hi) = self.min_max();
        let mut out = self.clone();
        for v in &mut out.samples {
            *v = inverse_lerp(lo, hi, *v);
        }
        out
    }
}

/// `(v - a) / (b - a)` clamped to `[0, 1]`; zero when `a == b`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((v - a) / (b - a)).clamp(0.0, 1.0)
    }
}
