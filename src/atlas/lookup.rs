//! Coordinate helpers for reading region ids out of an atlas volume.

/// Map a voxel of one grid onto a grid of a different resolution covering
/// the same space, by scaling each index with the ratio of dimensions and
/// rounding to the nearest voxel. Returns `None` if the result falls outside
/// the destination grid, or if a source dimension is zero.
pub fn map_voxel(
    src_dim: [usize; 3],
    dst_dim: [usize; 3],
    voxel: [usize; 3],
) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for axis in 0..3 {
        if src_dim[axis] == 0 {
            return None;
        }
        let scale = dst_dim[axis] as f64 / src_dim[axis] as f64;
        let mapped = (voxel[axis] as f64 * scale).round() as usize;
        if mapped >= dst_dim[axis] {
            return None;
        }
        out[axis] = mapped;
    }
    Some(out)
}

/// Region id stored in an atlas sample. Atlas volumes hold integer labels,
/// possibly as floats after scaling; non-finite samples count as background.
pub fn raw_id_from_value(value: f32) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}
