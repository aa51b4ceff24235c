//! Voxel to world coordinate transforms, as declared by the header's
//! orientation fields.
//!
//! The transform is picked the usual way: the sform when `sform_code > 0`,
//! otherwise the qform when `qform_code > 0`, otherwise a plain scaling by
//! the voxel spacing with no rotation and no offset.

use crate::header::NiftiHeader;
use log::warn;
use nalgebra::{Matrix3, Matrix4, Quaternion, Vector3, Vector4};

/// A 3x3 linear transform.
pub type Affine3 = Matrix3<f32>;
/// A 4x4 homogeneous affine transform.
pub type Affine4 = Matrix4<f32>;

/// Tolerance for a quaternion whose `b² + c² + d²` slightly exceeds 1.
const QUATERNION_THRESHOLD: f64 = -(::std::f32::EPSILON as f64) * 3.0;

/// Where an affine transform was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffineSource {
    /// `srow_x`, `srow_y` and `srow_z`
    SForm,
    /// quaternion, offsets and `pixdim` (including `qfac`)
    QForm,
    /// diagonal of `pixdim[1..=3]`
    Spacing,
}

impl NiftiHeader {
    /// Which orientation fields `affine` will use.
    pub fn affine_source(&self) -> AffineSource {
        if self.sform_code > 0 {
            AffineSource::SForm
        } else if self.qform_code > 0 {
            AffineSource::QForm
        } else {
            AffineSource::Spacing
        }
    }

    /// Get the voxel to world affine transform of this header.
    ///
    /// # Example
    ///
    /// ```
    /// use nifti_atlas::NiftiHeader;
    ///
    /// let hdr = NiftiHeader {
    ///     pixdim: [1., 2., 2., 2., 0., 0., 0., 0.],
    ///     sform_code: 4,
    ///     srow_x: [-2., 0., 0., 90.],
    ///     srow_y: [0., 2., 0., -126.],
    ///     srow_z: [0., 0., 2., -72.],
    ///     ..NiftiHeader::default()
    /// };
    /// let affine = hdr.affine();
    /// assert_eq!(affine[(0, 3)], 90.);
    /// assert_eq!(affine[(3, 3)], 1.);
    /// ```
    pub fn affine(&self) -> Affine4 {
        match self.affine_source() {
            AffineSource::SForm => sform_affine(self),
            AffineSource::QForm => qform_affine(self),
            AffineSource::Spacing => spacing_affine(self),
        }
    }
}

fn sform_affine(header: &NiftiHeader) -> Affine4 {
    let x = header.srow_x;
    let y = header.srow_y;
    let z = header.srow_z;
    #[rustfmt::skip]
    let affine = Affine4::new(
        x[0], x[1], x[2], x[3],
        y[0], y[1], y[2], y[3],
        z[0], z[1], z[2], z[3],
        0.0, 0.0, 0.0, 1.0,
    );
    affine
}

fn qform_affine(header: &NiftiHeader) -> Affine4 {
    let quaternion = fill_positive(Vector3::new(
        header.quatern_b,
        header.quatern_c,
        header.quatern_d,
    ));
    let rotation = quaternion_to_affine(quaternion);

    let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
    let spacing = Vector3::new(
        usable_spacing(header.pixdim[1]),
        usable_spacing(header.pixdim[2]),
        usable_spacing(header.pixdim[3]) * qfac,
    );
    let linear = rotation * Affine3::from_diagonal(&spacing);

    let mut affine = linear.to_homogeneous();
    affine[(0, 3)] = header.quatern_x;
    affine[(1, 3)] = header.quatern_y;
    affine[(2, 3)] = header.quatern_z;
    affine
}

fn spacing_affine(header: &NiftiHeader) -> Affine4 {
    Affine4::from_diagonal(&Vector4::new(
        usable_spacing(header.pixdim[1]),
        usable_spacing(header.pixdim[2]),
        usable_spacing(header.pixdim[3]),
        1.0,
    ))
}

/// Absolute voxel size, or 1 when the header value is zero or not finite.
pub(crate) fn usable_spacing(pixdim: f32) -> f32 {
    let s = pixdim.abs();
    if s > 0.0 && s.is_finite() {
        s
    } else {
        1.0
    }
}

/// Map continuous voxel coordinates to world coordinates.
pub fn voxel_to_world(affine: &Affine4, voxel: [f32; 3]) -> [f32; 3] {
    let p = affine * Vector4::new(voxel[0], voxel[1], voxel[2], 1.0);
    [p.x, p.y, p.z]
}

/// Map world coordinates to continuous voxel coordinates.
/// Returns `None` if the affine cannot be inverted.
pub fn world_to_voxel(affine: &Affine4, world: [f32; 3]) -> Option<[f32; 3]> {
    let inverse = affine.try_inverse()?;
    Some(voxel_to_world(&inverse, world))
}

/// Compute unit quaternion from last 3 values.
///
/// If w, x, y, z are the values in the full quaternion, assumes w is positive.
/// w = 0.0 corresponds to a 180 degree rotation.
///
/// If w is positive (assumed here), w is given by:
///     w = (1.0 - (x*x + y*y + z*z)).sqrt()
/// `1.0 - (x*x + y*y + z*z)` can be near zero, which will lead to numerical instability in sqrt.
/// Here we use f64 to reduce numerical instability. Values noticeably
/// below zero come from a broken header; w is then taken as zero as well.
pub(crate) fn fill_positive(xyz: Vector3<f32>) -> Quaternion<f32> {
    let xyz: Vector3<f64> = nalgebra::convert(xyz);
    let w2 = 1.0 - xyz.dot(&xyz);
    let w = if w2 < 0.0 {
        if w2 < QUATERNION_THRESHOLD {
            warn!(
                "Quaternion (b, c, d) has norm above 1 (1 - |q|² = {}), using w = 0",
                w2
            );
        }
        0.0
    } else {
        w2.sqrt()
    };
    Quaternion::new(w as f32, xyz.x as f32, xyz.y as f32, xyz.z as f32)
}

/// Calculate rotation matrix corresponding to quaternion.
///
/// Rotation matrix applies to column vectors, and is applied to the left of coordinate vectors.
/// The algorithm here allows non-unit quaternions.
///
/// Algorithm from https://en.wikipedia.org/wiki/Rotation_matrix#Quaternion
pub(crate) fn quaternion_to_affine(q: Quaternion<f32>) -> Affine3 {
    let nq = q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k;
    if nq < ::std::f32::EPSILON {
        return Affine3::identity();
    }
    let s = 2.0 / nq;
    let x = q.i * s;
    let y = q.j * s;
    let z = q.k * s;
    let wx = q.w * x;
    let wy = q.w * y;
    let wz = q.w * z;
    let xx = q.i * x;
    let xy = q.i * y;
    let xz = q.i * z;
    let yy = q.j * y;
    let yz = q.j * z;
    let zz = q.k * z;
    Affine3::new(
        1.0 - (yy + zz), xy - wz, xz + wy,
        xy + wz, 1.0 - (xx + zz), yz - wx,
        xz - wy, yz + wx, 1.0 - (xx + yy),
    )
}
