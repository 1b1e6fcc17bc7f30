//! 3-vector helpers and the triangular surface panel type

/// A point or direction in 3-space.
pub type Vec3 = [f64; 3];

/// Component-wise difference `a - b`.
#[inline]
pub fn vec_sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Euclidean length of `a`.
#[inline]
pub fn vec_norm(a: &Vec3) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

/// Euclidean distance between `a` and `b`.
#[inline]
pub fn vec_distance(a: &Vec3, b: &Vec3) -> f64 {
    vec_norm(&vec_sub(a, b))
}

/// Cross product `a x b`.
#[inline]
pub fn vec_cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// `a + s * b`.
#[inline]
pub fn vec_scale_add(a: &Vec3, s: f64, b: &Vec3) -> Vec3 {
    [a[0] + s * b[0], a[1] + s * b[1], a[2] + s * b[2]]
}

/// A triangular surface panel of a discretized geometry.
///
/// Panels index into their mesh's vertex array rather than owning
/// coordinates; centroid, unit normal (right-hand rule over the vertex
/// ordering), and area are computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Indices of the three corner vertices in the owning mesh
    pub vertex_indices: [usize; 3],
    /// Position of the panel centroid
    pub centroid: Vec3,
    /// Unit normal, right-hand rule over `vertex_indices` order
    pub normal: Vec3,
    /// Panel surface area
    pub area: f64,
    /// Index of this panel within the owning mesh
    pub index: usize,
}

impl Panel {
    /// Build a panel from a vertex array and three vertex indices.
    pub fn new(vertices: &[Vec3], vertex_indices: [usize; 3], index: usize) -> Self {
        let v0 = &vertices[vertex_indices[0]];
        let v1 = &vertices[vertex_indices[1]];
        let v2 = &vertices[vertex_indices[2]];

        let centroid = [
            (v0[0] + v1[0] + v2[0]) / 3.0,
            (v0[1] + v1[1] + v2[1]) / 3.0,
            (v0[2] + v1[2] + v2[2]) / 3.0,
        ];

        let e1 = vec_sub(v1, v0);
        let e2 = vec_sub(v2, v0);
        let cross = vec_cross(&e1, &e2);
        let cross_norm = vec_norm(&cross);
        let area = 0.5 * cross_norm;
        let normal = if cross_norm > 0.0 {
            [
                cross[0] / cross_norm,
                cross[1] / cross_norm,
                cross[2] / cross_norm,
            ]
        } else {
            [0.0, 0.0, 0.0]
        };

        Self {
            vertex_indices,
            centroid,
            normal,
            area,
            index,
        }
    }

    /// Flip the panel orientation: negate the normal and swap the first and
    /// third vertices so the right-hand-rule convention is preserved.
    pub fn flip(&mut self) {
        self.normal = [-self.normal[0], -self.normal[1], -self.normal[2]];
        self.vertex_indices.swap(0, 2);
    }

    /// The three corner coordinates of this panel, in index order.
    pub fn corners(&self, vertices: &[Vec3]) -> [Vec3; 3] {
        [
            vertices[self.vertex_indices[0]],
            vertices[self.vertex_indices[1]],
            vertices[self.vertex_indices[2]],
        ]
    }
}
