//! Miscellaneous volume-related functions

/// Flat index of voxel `(i, j, k)` in a volume of the given dimensions,
/// x varying fastest. `None` if the coordinates are out of bounds.
pub fn coords_to_index(coords: [usize; 3], dim: [usize; 3]) -> Option<usize> {
    if coords.iter().zip(&dim).all(|(c, d)| c < d) {
        Some(coords[0] + dim[0] * (coords[1] + dim[1] * coords[2]))
    } else {
        None
    }
}

/// Same as `coords_to_index`, for signed coordinates, which may come from
/// rounding a continuous position.
pub fn signed_coords_to_index(coords: [i64; 3], dim: [usize; 3]) -> Option<usize> {
    if coords.iter().any(|c| *c < 0) {
        return None;
    }
    coords_to_index(
        [coords[0] as usize, coords[1] as usize, coords[2] as usize],
        dim,
    )
}
