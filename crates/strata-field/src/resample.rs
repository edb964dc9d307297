use crate::error::{GenError, GenResult};
use crate::grid::{FieldGrid, GridDims};

/// Source coordinate for target sample `i`, with first and last samples aligned.
#[inline]
fn source_coord(i: usize, src: usize, dst: usize) -> (usize, f32) {
    if src < 2 || dst < 2 {
        return (0, 0.0);
    }
    let g = i as f32 * (src - 1) as f32 / (dst - 1) as f32;
    let i0 = (g.floor() as usize).min(src - 2);
    (i0, g - i0 as f32)
}

/// Common `src / dst` cell-count ratio of all axes, compared exactly by
/// cross-multiplication. Axes with no cells on either side only match each other.
fn uniform_ratio(axes: &[(usize, usize)]) -> Option<f32> {
    let mut first: Option<(usize, usize)> = None;
    for &(src, dst) in axes {
        if src == 0 || dst == 0 {
            if src != dst {
                return None;
            }
            continue;
        }
        match first {
            None => first = Some((src, dst)),
            Some((s0, d0)) if s0 * dst != src * d0 => return None,
            Some(_) => {}
        }
    }
    Some(first.map_or(1.0, |(src, dst)| src as f32 / dst as f32))
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl FieldGrid {
    /// Bilinear (trilinear for volumes) resample onto `target`.
    ///
    /// Target and source must both be planar or both be volumes, and every
    /// axis must change by the same ratio of cell counts, since a grid has a
    /// single cell size. Corner samples are preserved, and cell size is
    /// rescaled so the world extent stays the same.
    pub fn resample(&self, target: GridDims) -> GenResult<FieldGrid> {
        let target = target.validate()?;
        if target.is_volume() != self.is_volume() {
            return Err(GenError::InvalidDimensions {
                width: target.width(),
                height: target.height(),
                depth: target.depth(),
                reason: "resample target must match source dimensionality",
            });
        }
        let (sw, sh, sd) = (self.width(), self.height(), self.depth());
        let (tw, th, td) = (target.width(), target.height(), target.depth());
        let mut axes = vec![(sw - 1, tw - 1), (sh - 1, th - 1)];
        if target.is_volume() {
            axes.push((sd - 1, td - 1));
        }
        let Some(scale) = uniform_ratio(&axes) else {
            return Err(GenError::InvalidDimensions {
                width: tw,
                height: th,
                depth: td,
                reason: "resample must scale every axis by the same ratio",
            });
        };
        let x_map: Vec<(usize, f32)> = (0..tw).map(|x| source_coord(x, sw, tw)).collect();
        let y_map: Vec<(usize, f32)> = (0..th).map(|y| source_coord(y, sh, th)).collect();
        let z_map: Vec<(usize, f32)> = (0..td).map(|z| source_coord(z, sd, td)).collect();

        let out = FieldGrid::from_fn(target, |x, y, z| {
            let (x0, fx) = x_map[x];
            let (y0, fy) = y_map[y];
            let (z0, fz) = z_map[z];
            let x1 = (x0 + 1).min(sw - 1);
            let y1 = (y0 + 1).min(sh - 1);
            let z1 = (z0 + 1).min(sd - 1);
            let plane = |zz: usize| {
                let top = lerp(self.get(x0, y0, zz), self.get(x1, y0, zz), fx);
                let bottom = lerp(self.get(x0, y1, zz), self.get(x1, y1, zz), fx);
                lerp(top, bottom, fy)
            };
            if z1 == z0 {
                plane(z0)
            } else {
                lerp(plane(z0), plane(z1), fz)
            }
        })?;

        Ok(out
            .with_cell_size(self.cell_size() * scale)
            .with_origin(self.origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsample_interpolates_midpoints() {
        let g = FieldGrid::from_samples(GridDims::planar(2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let up = g.resample(GridDims::planar(3, 3)).unwrap();
        assert_eq!(up.get2(1, 0), 0.5);
        assert_eq!(up.get2(1, 1), 1.5);
        assert_eq!(up.get2(2, 2), 3.0);
        assert_eq!(up.cell_size(), 0.5);
    }

    #[test]
    fn uneven_axis_ratios_are_rejected() {
        let g = FieldGrid::new(GridDims::planar(3, 3)).unwrap();
        assert!(matches!(
            g.resample(GridDims::planar(3, 9)),
            Err(GenError::InvalidDimensions { .. })
        ));
        let v = FieldGrid::new(GridDims::volume(5, 5, 5)).unwrap();
        assert!(v.resample(GridDims::volume(9, 9, 5)).is_err());
    }

    #[test]
    fn extent_survives_uneven_side_lengths() {
        let g = FieldGrid::new(GridDims::planar(5, 3))
            .unwrap()
            .with_cell_size(2.0);
        let r = g.resample(GridDims::planar(9, 5)).unwrap();
        assert_eq!(r.cell_size(), 1.0);
        assert_eq!(r.extent(), g.extent());
    }

    #[test]
    fn trilinear_volume_resample() {
        let g = FieldGrid::from_fn(GridDims::volume(3, 3, 3), |x, y, z| {
            (x + 3 * y + 9 * z) as f32
        })
        .unwrap()
        .with_cell_size(1.5);
        let r = g.resample(GridDims::volume(5, 5, 5)).unwrap();
        assert_eq!(r.extent(), g.extent());
        assert_eq!(r.cell_size(), 0.75);
        // The field is linear, so trilinear samples are exact.
        assert_eq!(r.get(1, 1, 1), 0.5 + 1.5 + 4.5);
        assert_eq!(r.get(4, 4, 4), 26.0);
        assert_eq!(r.get(2, 0, 3), 1.0 + 13.5);
    }

    #[test]
    fn dimensionality_must_match() {
        let g = FieldGrid::new(GridDims::planar(4, 4)).unwrap();
        assert!(g.resample(GridDims::volume(4, 4, 4)).is_err());
    }
}
