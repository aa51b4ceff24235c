//! Iso-surface extraction from scalar volumes.
//!
//! The surface of the region where the samples reach a threshold is built
//! with marching cubes, and handed out as a plain [`MeshGeometry`] with no
//! ties to any rendering engine.
//!
//! [`MeshGeometry`]: struct.MeshGeometry.html

mod extract;
pub mod tables;

pub use self::extract::{
    extract_isosurface, extract_isosurface_with, Interpolation, IsoSurfaceOptions,
    MIN_EDGE_FRACTION,
};

use nalgebra::Vector3;

/// A triangle mesh: vertex positions, one normal per vertex, and triangles
/// as triples of vertex indices.
///
/// Positions are in the physical units of the volume's spacing, centered on
/// the volume. Triangles are wound counterclockwise when seen from outside
/// the enclosed region, and normals point outwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals, zero for a vertex with no area around it
    pub normals: Vec<[f32; 3]>,
    /// Triangles, as indices into `positions`
    pub indices: Vec<[u32; 3]>,
}

impl MeshGeometry {
    /// Build a mesh from positions and triangles, computing the normals.
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<[u32; 3]>) -> MeshGeometry {
        let normals = vertex_normals(&positions, &indices);
        MeshGeometry {
            positions,
            normals,
            indices,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Whether the mesh has no triangle.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for a mesh
    /// without vertices.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        }))
    }
}

/// Area-weighted vertex normals: each triangle adds its (unnormalized)
/// face normal to its three vertices.
fn vertex_normals(positions: &[[f32; 3]], indices: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::<f32>::zeros(); positions.len()];
    for tri in indices {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vector3::from(positions[a]);
        let pb = Vector3::from(positions[b]);
        let pc = Vector3::from(positions[c]);
        let n = (pb - pa).cross(&(pc - pa));
        sums[a] += n;
        sums[b] += n;
        sums[c] += n;
    }
    sums.into_iter()
        .map(|n| {
            let norm = n.norm();
            if norm > 0. && norm.is_finite() {
                (n / norm).into()
            } else {
                [0f32; 3]
            }
        })
        .collect()
}
