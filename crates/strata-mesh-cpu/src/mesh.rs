use strata_geom::{Aabb, Vec3};

/// Flat triangle mesh buffers handed to the render collaborator.
///
/// `pos` and `norm` hold xyz triples, `uv` holds pairs, `idx` holds triangle
/// corner indices into the vertex arrays.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Mesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
    }

    #[inline]
    pub fn reserve(&mut self, vertices: usize, triangles: usize) {
        self.pos.reserve(vertices * 3);
        self.norm.reserve(vertices * 3);
        self.uv.reserve(vertices * 2);
        self.idx.reserve(triangles * 3);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a vertex with a zero normal and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, p: Vec3, uv: [f32; 2]) -> u32 {
        let i = self.vertex_count() as u32;
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[0.0, 0.0, 0.0]);
        self.uv.extend_from_slice(&uv);
        i
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.idx.extend_from_slice(&[a, b, c]);
    }

    #[inline]
    pub fn position(&self, i: u32) -> Vec3 {
        let o = i as usize * 3;
        Vec3::new(self.pos[o], self.pos[o + 1], self.pos[o + 2])
    }

    #[inline]
    pub fn normal(&self, i: u32) -> Vec3 {
        let o = i as usize * 3;
        Vec3::new(self.norm[o], self.norm[o + 1], self.norm[o + 2])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.idx.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Appends `other`, rebasing its indices by the current vertex count.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertex_count() as u32;
        self.pos.extend_from_slice(&other.pos);
        self.norm.extend_from_slice(&other.norm);
        self.uv.extend_from_slice(&other.uv);
        self.idx.extend(other.idx.iter().map(|i| i + base));
    }

    /// Concatenates `parts` in order.
    pub fn merge(parts: &[Mesh]) -> Mesh {
        let vertices = parts.iter().map(Mesh::vertex_count).sum();
        let triangles = parts.iter().map(Mesh::triangle_count).sum();
        let mut out = Mesh::default();
        out.reserve(vertices, triangles);
        for part in parts {
            out.append(part);
        }
        out
    }

    /// Rebuilds per-vertex normals as the area-weighted sum of the adjacent
    /// triangle normals. Vertices touched only by degenerate triangles keep a
    /// zero normal.
    pub fn recalculate_normals(&mut self) {
        self.norm.clear();
        self.norm.resize(self.pos.len(), 0.0);
        for i in 0..self.triangle_count() {
            let [a, b, c] = [self.idx[i * 3], self.idx[i * 3 + 1], self.idx[i * 3 + 2]];
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));
            let n = (pb - pa).cross(pc - pa);
            for v in [a, b, c] {
                let o = v as usize * 3;
                self.norm[o] += n.x;
                self.norm[o + 1] += n.y;
                self.norm[o + 2] += n.z;
            }
        }
        for n in self.norm.chunks_exact_mut(3) {
            let v = Vec3::new(n[0], n[1], n[2]);
            if v.length_sq() > 0.0 {
                n.copy_from_slice(&v.normalized().to_array());
            }
        }
    }

    /// Buffer lengths agree and every index addresses an existing vertex.
    pub fn is_well_formed(&self) -> bool {
        let vc = self.vertex_count();
        self.pos.len() % 3 == 0
            && self.norm.len() == self.pos.len()
            && self.uv.len() == vc * 2
            && self.idx.len() % 3 == 0
            && self.idx.iter().all(|&i| (i as usize) < vc)
    }

    pub fn bounds(&self) -> Aabb {
        let mut bb = Aabb::EMPTY;
        for p in self.pos.chunks_exact(3) {
            bb.include(Vec3::new(p[0], p[1], p[2]));
        }
        bb
    }
}
