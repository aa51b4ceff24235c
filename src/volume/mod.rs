//! This module defines the decoded voxel volume, as well as the data
//! element conversions used to build it from a NIfTI payload.
//! An integration with `ndarray` is available through the
//! `ndarray_volumes` feature, which is enabled by default.

pub mod element;
#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;
mod util;

pub use self::util::coords_to_index;

use crate::affine::{usable_spacing, voxel_to_world, world_to_voxel, Affine4};
use crate::error::{NiftiError, Result};
use crate::header::NiftiHeader;
use crate::stats::ValueRange;
use crate::typedef::NiftiType;
use log::warn;

/// A decoded 3-D scalar volume.
///
/// Samples are stored as `f32` in a flat vector, x varying fastest, then y,
/// then z: voxel `(i, j, k)` lives at `i + j * dimX + k * dimX * dimY`.
/// The volume is immutable once built, and the value range of its positive
/// samples is computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    header: NiftiHeader,
    dim: [usize; 3],
    spacing: [f32; 3],
    data: Vec<f32>,
    range: ValueRange,
}

impl Volume {
    /// Build a volume from its dimensions, voxel spacing and samples.
    /// A matching single-precision NIfTI header is synthesized, with an
    /// identity orientation scaled by the spacing.
    ///
    /// # Errors
    ///
    /// - `NiftiError::InconsistentDim` if a dimension is zero or does not fit
    ///   a NIfTI-1 header.
    /// - `NiftiError::InvalidSpacing` if a spacing is not finite and positive.
    /// - `NiftiError::IncompatibleLength` if `data` does not hold exactly
    ///   one sample per voxel.
    ///
    /// # Example
    ///
    /// ```
    /// use nifti_atlas::Volume;
    /// # use nifti_atlas::error::Result;
    ///
    /// # fn run() -> Result<()> {
    /// let volume = Volume::from_parts([2, 1, 1], [1., 1., 1.], vec![0., 3.])?;
    /// assert_eq!(volume.get([1, 0, 0]), Some(3.));
    /// assert_eq!(volume.value_range().bounds(), Some((3., 3.)));
    /// # Ok(())
    /// # }
    /// # run().unwrap()
    /// ```
    pub fn from_parts(dim: [usize; 3], spacing: [f32; 3], data: Vec<f32>) -> Result<Volume> {
        let mut header_dim = [3i16, 1, 1, 1, 1, 1, 1, 1];
        for (axis, &d) in dim.iter().enumerate() {
            if d == 0 || d > i16::max_value() as usize {
                return Err(NiftiError::InconsistentDim(axis as u8 + 1, d as i64));
            }
            header_dim[axis + 1] = d as i16;
        }
        if spacing.iter().any(|s| !(s.is_finite() && *s > 0.)) {
            return Err(NiftiError::InvalidSpacing(spacing));
        }
        let expected = dim[0] * dim[1] * dim[2];
        if data.len() != expected {
            return Err(NiftiError::IncompatibleLength(expected, data.len()));
        }

        let header = NiftiHeader {
            dim: header_dim,
            datatype: NiftiType::Float32 as i16,
            bitpix: 32,
            pixdim: [1., spacing[0], spacing[1], spacing[2], 0., 0., 0., 0.],
            ..NiftiHeader::default()
        };
        let range = ValueRange::of_positive(&data);
        Ok(Volume {
            header,
            dim,
            spacing,
            data,
            range,
        })
    }

    /// Build a volume from a parsed header and the samples already decoded
    /// (and scaled) from the first 3-D frame of its payload.
    pub(crate) fn from_header(header: NiftiHeader, data: Vec<f32>) -> Result<Volume> {
        let dim = header.spatial_dim()?;
        let expected = dim[0] * dim[1] * dim[2];
        if data.len() != expected {
            return Err(NiftiError::IncompatibleLength(expected, data.len()));
        }

        let mut spacing = [1f32; 3];
        for (axis, s) in spacing.iter_mut().enumerate() {
            let pixdim = header.pixdim[axis + 1];
            *s = usable_spacing(pixdim);
            if pixdim == 0. || !pixdim.is_finite() {
                warn!("pixdim[{}] is {}, assuming a spacing of 1", axis + 1, pixdim);
            }
        }

        let range = ValueRange::of_positive(&data);
        if range.is_empty() {
            warn!("Volume has no positive sample, its value range is empty");
        }
        Ok(Volume {
            header,
            dim,
            spacing,
            data,
            range,
        })
    }

    /// The header this volume was decoded from, or the one synthesized
    /// for it.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Number of voxels along each axis.
    pub fn dim(&self) -> [usize; 3] {
        self.dim
    }

    /// Physical size of a voxel along each axis, always positive.
    pub fn spacing(&self) -> [f32; 3] {
        self.spacing
    }

    /// All samples, x varying fastest.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Move the samples out of the volume, discarding the rest.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Range of the strictly positive samples.
    pub fn value_range(&self) -> ValueRange {
        self.range
    }

    /// Flat index of voxel `(i, j, k)`, if inside the volume.
    pub fn index_of(&self, coords: [usize; 3]) -> Option<usize> {
        coords_to_index(coords, self.dim)
    }

    /// Sample at voxel `(i, j, k)`, if inside the volume.
    pub fn get(&self, coords: [usize; 3]) -> Option<f32> {
        self.index_of(coords).map(|i| self.data[i])
    }

    /// Voxel to world transform of this volume.
    pub fn affine(&self) -> Affine4 {
        self.header.affine()
    }

    /// World position of the given voxel's center.
    pub fn world_at_voxel(&self, coords: [usize; 3]) -> [f32; 3] {
        voxel_to_world(
            &self.affine(),
            [coords[0] as f32, coords[1] as f32, coords[2] as f32],
        )
    }

    /// The voxel containing the given world position, found by inverting
    /// the affine and rounding to the nearest voxel center. `None` if the
    /// position falls outside the volume.
    pub fn voxel_at_world(&self, world: [f32; 3]) -> Option<[usize; 3]> {
        let v = world_to_voxel(&self.affine(), world)?;
        if v.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let coords = [
            v[0].round() as i64,
            v[1].round() as i64,
            v[2].round() as i64,
        ];
        util::signed_coords_to_index(coords, self.dim)?;
        Some([coords[0] as usize, coords[1] as usize, coords[2] as usize])
    }
}
