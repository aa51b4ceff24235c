use super::tables::{CORNER_OFFSETS, EDGE_FLAGS, EDGE_TABLE, TRI_TABLE};
use super::MeshGeometry;
use crate::volume::Volume;
use log::debug;
use std::collections::HashMap;

/// Placement of the vertices along the cube edges crossed by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Halfway between the included and the excluded voxel. Only the
    /// inclusion of each voxel matters, so every included voxel contributes
    /// to the surface, even when its value equals the threshold.
    Midpoint,
    /// Where the linear interpolation of the two values meets the
    /// threshold, kept at least [`MIN_EDGE_FRACTION`] of the edge away from
    /// both voxels. A voxel exactly at the threshold thus still encloses a
    /// small surface. Voxels outside the grid fall back to the midpoint.
    ///
    /// [`MIN_EDGE_FRACTION`]: constant.MIN_EDGE_FRACTION.html
    Linear,
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Midpoint
    }
}

/// Smallest distance, as a fraction of the edge, between a linearly placed
/// vertex and either voxel of its edge.
pub const MIN_EDGE_FRACTION: f32 = 0.01;

/// Options for iso-surface extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsoSurfaceOptions {
    /// Vertex placement along crossed edges
    pub interpolation: Interpolation,
}

impl IsoSurfaceOptions {
    /// Default options: midpoint placement.
    pub fn new() -> IsoSurfaceOptions {
        IsoSurfaceOptions::default()
    }

    /// Set the vertex placement.
    pub fn interpolation(mut self, interpolation: Interpolation) -> IsoSurfaceOptions {
        self.interpolation = interpolation;
        self
    }
}

/// Extract the surface enclosing the voxels with a value at or above
/// `threshold`, with the default options.
///
/// # Example
///
/// ```
/// use nifti_atlas::{extract_isosurface, Volume};
/// # use nifti_atlas::error::Result;
///
/// # fn run() -> Result<()> {
/// let volume = Volume::from_parts([1, 1, 1], [1., 1., 1.], vec![5.])?;
/// let mesh = extract_isosurface(&volume, 5.);
/// // a lone voxel becomes an octahedron
/// assert_eq!(mesh.vertex_count(), 6);
/// assert_eq!(mesh.triangle_count(), 8);
/// assert!(extract_isosurface(&volume, 6.).is_empty());
/// # Ok(())
/// # }
/// # run().unwrap()
/// ```
pub fn extract_isosurface(volume: &Volume, threshold: f32) -> MeshGeometry {
    extract_isosurface_with(volume, threshold, &IsoSurfaceOptions::default())
}

/// Extract the surface enclosing the voxels with a value at or above
/// `threshold`.
///
/// Voxel `(i, j, k)` is placed at `((i - dimX / 2) * spacingX, ...)`. The
/// grid is treated as surrounded by excluded voxels, so regions touching
/// the border are closed off there; no sample outside the volume is read.
/// NaN samples are never included.
pub fn extract_isosurface_with(
    volume: &Volume,
    threshold: f32,
    options: &IsoSurfaceOptions,
) -> MeshGeometry {
    let grid = Grid::new(volume);
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();
    // one vertex per lattice edge, keyed by its lower point and axis
    let mut welded: HashMap<([i64; 3], usize), u32> = HashMap::new();

    let [nx, ny, nz] = grid.dim;
    // cells start one voxel before the grid so that its border closes
    for k in -1..nz {
        for j in -1..ny {
            for i in -1..nx {
                let mut corners = [[0i64; 3]; 8];
                let mut values = [None; 8];
                let mut cube_index = 0usize;
                for (c, offset) in CORNER_OFFSETS.iter().enumerate() {
                    let p = [i + offset[0] as i64, j + offset[1] as i64, k + offset[2] as i64];
                    let v = grid.sample(p);
                    if v.map_or(false, |v| v >= threshold) {
                        cube_index |= 1 << c;
                    }
                    corners[c] = p;
                    values[c] = v;
                }
                let flags = EDGE_FLAGS[cube_index];
                if flags == 0 {
                    continue;
                }

                let mut edge_vertex = [0u32; 12];
                for (e, &(a, b, axis)) in EDGE_TABLE.iter().enumerate() {
                    if flags & (1 << e) == 0 {
                        continue;
                    }
                    // walk the edge from its lower lattice point
                    let (lo, hi, v_lo, v_hi) = if corners[a][axis] < corners[b][axis] {
                        (corners[a], corners[b], values[a], values[b])
                    } else {
                        (corners[b], corners[a], values[b], values[a])
                    };
                    let t = match (options.interpolation, v_lo, v_hi) {
                        (Interpolation::Linear, Some(v_lo), Some(v_hi)) => {
                            let t = (threshold - v_lo) / (v_hi - v_lo);
                            if t.is_finite() {
                                t.max(MIN_EDGE_FRACTION).min(1. - MIN_EDGE_FRACTION)
                            } else {
                                0.5
                            }
                        }
                        _ => 0.5,
                    };
                    edge_vertex[e] = *welded.entry((lo, axis)).or_insert_with(|| {
                        let p = grid.position(lo);
                        let q = grid.position(hi);
                        positions.push([
                            p[0] + t * (q[0] - p[0]),
                            p[1] + t * (q[1] - p[1]),
                            p[2] + t * (q[2] - p[2]),
                        ]);
                        (positions.len() - 1) as u32
                    });
                }

                for tri in TRI_TABLE[cube_index].chunks(3).take_while(|t| t[0] >= 0) {
                    let a = edge_vertex[tri[0] as usize];
                    let b = edge_vertex[tri[1] as usize];
                    let c = edge_vertex[tri[2] as usize];
                    indices.push([a, b, c]);
                }
            }
        }
    }

    debug!(
        "extracted iso-surface at {}: {} vertices, {} triangles",
        threshold,
        positions.len(),
        indices.len()
    );
    MeshGeometry::new(positions, indices)
}

struct Grid<'a> {
    data: &'a [f32],
    dim: [i64; 3],
    spacing: [f32; 3],
}

impl<'a> Grid<'a> {
    fn new(volume: &'a Volume) -> Grid<'a> {
        let [x, y, z] = volume.dim();
        Grid {
            data: volume.data(),
            dim: [x as i64, y as i64, z as i64],
            spacing: volume.spacing(),
        }
    }

    /// Sample at a lattice point, `None` outside the grid.
    fn sample(&self, p: [i64; 3]) -> Option<f32> {
        let [nx, ny, nz] = self.dim;
        if p[0] < 0 || p[1] < 0 || p[2] < 0 || p[0] >= nx || p[1] >= ny || p[2] >= nz {
            return None;
        }
        self.data
            .get((p[0] + nx * (p[1] + ny * p[2])) as usize)
            .cloned()
    }

    fn position(&self, p: [i64; 3]) -> [f32; 3] {
        let mut out = [0f32; 3];
        for axis in 0..3 {
            out[axis] = (p[axis] as f32 - self.dim[axis] as f32 / 2.) * self.spacing[axis];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Every directed edge is matched by exactly one opposite edge.
    fn is_closed(mesh: &MeshGeometry) -> bool {
        let mut edges: HashMap<(u32, u32), i32> = HashMap::new();
        for t in &mesh.indices {
            for &(u, v) in &[(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *edges.entry((u, v)).or_insert(0) += 1;
            }
        }
        edges
            .iter()
            .all(|(&(u, v), &n)| edges.get(&(v, u)).cloned().unwrap_or(0) == n)
    }

    #[test]
    fn lone_voxel_is_an_octahedron() {
        let volume = Volume::from_parts([1, 1, 1], [2., 3., 4.], vec![5.]).unwrap();
        let mesh = extract_isosurface(&volume, 5.);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.positions[0], [-1., -3., -2.]);
        assert!(is_closed(&mesh));
        // centered on the voxel at (-1, -1.5, -2)
        assert_eq!(mesh.bounds(), Some(([-2., -3., -4.], [0., 0., 0.])));
    }

    #[test]
    fn linear_interpolation_at_the_border() {
        let volume = Volume::from_parts([1, 1, 1], [1., 1., 1.], vec![5.]).unwrap();
        let options = IsoSurfaceOptions::new().interpolation(Interpolation::Linear);
        // a padding neighbor keeps the vertex at the midpoint
        let mesh = extract_isosurface_with(&volume, 5., &options);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn closed_on_noise() {
        let dim = [5, 4, 3];
        let data: Vec<f32> = (0..60u32).map(|i| ((i * 7919) % 13) as f32).collect();
        let volume = Volume::from_parts(dim, [1., 1., 1.], data).unwrap();
        for &interpolation in &[Interpolation::Midpoint, Interpolation::Linear] {
            let options = IsoSurfaceOptions::new().interpolation(interpolation);
            // 12 is the largest value, every included voxel sits at the threshold
            for &threshold in &[0., 3., 6.5, 12.] {
                let mesh = extract_isosurface_with(&volume, threshold, &options);
                assert!(!mesh.is_empty());
                assert!(is_closed(&mesh));
                assert_eq!(mesh.normals.len(), mesh.vertex_count());
                let mut used = vec![false; mesh.vertex_count()];
                for t in &mesh.indices {
                    assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
                    for &v in t {
                        used[v as usize] = true;
                    }
                }
                assert!(used.iter().all(|&u| u), "unused vertex at {}", threshold);
            }
        }
    }

    #[test]
    fn linear_voxel_at_threshold_keeps_its_surface() {
        let mut data = vec![0.; 27];
        data[13] = 5.;
        let volume = Volume::from_parts([3, 3, 3], [1., 1., 1.], data).unwrap();
        let options = IsoSurfaceOptions::new().interpolation(Interpolation::Linear);
        let mesh = extract_isosurface_with(&volume, 5., &options);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(is_closed(&mesh));
        // pulled towards the voxel at (-0.5, -0.5, -0.5)
        for p in &mesh.positions {
            let d: f32 = p.iter().map(|c| (c + 0.5).abs()).sum();
            assert!((d - MIN_EDGE_FRACTION).abs() < 1e-5, "vertex {:?}", p);
        }
    }

    #[test]
    fn nan_is_excluded() {
        let volume =
            Volume::from_parts([2, 1, 1], [1., 1., 1.], vec![std::f32::NAN, 1.]).unwrap();
        let mesh = extract_isosurface(&volume, 0.5);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(extract_isosurface(&volume, std::f32::NAN).is_empty());
    }
}
