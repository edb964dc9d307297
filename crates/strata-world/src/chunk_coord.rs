#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Global index of this chunk's first sample along each axis.
    #[inline]
    pub fn sample_base(self, chunk_dims: [usize; 3]) -> [i64; 3] {
        [
            i64::from(self.cx) * chunk_dims[0] as i64,
            i64::from(self.cy) * chunk_dims[1] as i64,
            i64::from(self.cz) * chunk_dims[2] as i64,
        ]
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.cx, self.cy, self.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_base_scales_by_chunk_dims() {
        let c = ChunkCoord::from((2, 0, -1));
        assert_eq!(c.sample_base([16, 8, 4]), [32, 0, -4]);
        assert_eq!(c.offset(1, 1, 1), ChunkCoord::new(3, 1, 0));
        assert_eq!(c.to_string(), "(2, 0, -1)");
    }
}
