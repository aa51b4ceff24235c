//! Interfaces and implementations specific to integration with `ndarray`.
//!
//! This module introduces the trait [`IntoNdArray`], which is implemented for
//! decoded volumes and maps them into a 3-dimensional [`Array3`] of `f32`
//! samples, indexed as `[i, j, k]`. Scaling from the `scl_slope` and
//! `scl_inter` attributes was already applied at decoding time.
//!
//! #### Note on memory order
//!
//! NIfTI volumes are stored in column major order (also called Fortran
//! order). The array resulting from this operation keeps that memory order,
//! rather than the usual row major order (AKA C ordering), so that no copy
//! of the samples is needed.
//!
//! [`IntoNdArray`]: ./trait.IntoNdArray.html
//! [`Array3`]: ../../../ndarray/type.Array3.html
use super::Volume;
use ndarray::{Array3, ShapeBuilder};

/// Trait for volumes which can be converted to an ndarray.
///
/// Please see the [module-level documentation](index.html) for more details.
pub trait IntoNdArray {
    /// Consume the volume into a 3-dimensional array of samples.
    fn into_ndarray(self) -> Array3<f32>;
}

impl IntoNdArray for Volume {
    fn into_ndarray(self) -> Array3<f32> {
        let [x, y, z] = self.dim();
        let data = self.into_data();
        match Array3::from_shape_vec((x, y, z).f(), data) {
            Ok(array) => array,
            // length always matches the dimensions of a built volume
            Err(_) => Array3::zeros((x, y, z).f()),
        }
    }
}

impl<'a> IntoNdArray for &'a Volume {
    fn into_ndarray(self) -> Array3<f32> {
        let data = self.data();
        let dim = self.dim();
        Array3::from_shape_fn((dim[0], dim[1], dim[2]).f(), |(i, j, k)| {
            data[i + dim[0] * (j + dim[1] * k)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::IntoNdArray;
    use crate::volume::Volume;

    #[test]
    fn indexing_matches_volume() {
        let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let volume = Volume::from_parts([2, 3, 4], [1.; 3], data).unwrap();
        let by_ref = (&volume).into_ndarray();
        let owned = volume.clone().into_ndarray();
        assert_eq!(by_ref, owned);
        assert_eq!(owned.shape(), &[2, 3, 4]);
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    assert_eq!(Some(owned[[i, j, k]]), volume.get([i, j, k]));
                }
            }
        }
    }
}
