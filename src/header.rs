//! This module defines the `NiftiHeader` struct, which is used
//! to provide important information about NIFTI-1 volumes.

use crate::error::{NiftiError, Result};
use crate::typedef::*;
use crate::util::Endianness;
use byteordered::ByteOrdered;
use num_traits::FromPrimitive;
use std::io::Read;

/// Size of a NIfTI-1 header in bytes.
pub const HEADER_SIZE: usize = 348;
/// Byte offset of the magic code within the header.
pub const MAGIC_OFFSET: usize = 344;
/// Magic code for NIFTI-1 header files (extention ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extention ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// The NIFTI-1 header data type.
/// All fields are public and named after the specification's header file.
/// The type of each field was adjusted according to their use and
/// array limitations.
///
/// The orientation fields (`qform_*`, `quatern_*`, `srow_*`) are kept as read;
/// see the [`affine`](crate::affine) module for turning them into a transform.
///
/// # Example
///
/// ```
/// use nifti_atlas::{NiftiHeader, NiftiType};
///
/// let hdr = NiftiHeader {
///     dim: [3, 91, 109, 91, 1, 1, 1, 1],
///     datatype: NiftiType::Int16 as i16,
///     bitpix: 16,
///     ..NiftiHeader::default()
/// };
/// assert_eq!(hdr.data_type().unwrap(), NiftiType::Int16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header size, must be 348
    pub sizeof_hdr: i32,
    /// Unused in NIFTI-1
    pub data_type: [u8; 10],
    /// Unused in NIFTI-1
    pub db_name: [u8; 18],
    /// Unused in NIFTI-1
    pub extents: i32,
    /// Unused in NIFTI-1
    pub session_error: i16,
    /// Unused in NIFTI-1
    pub regular: u8,
    /// MRI slice ordering
    pub dim_info: u8,
    /// Data array dimensions
    pub dim: [i16; 8],
    /// 1st intent parameter
    pub intent_p1: f32,
    /// 2nd intent parameter
    pub intent_p2: f32,
    /// 3rd intent parameter
    pub intent_p3: f32,
    /// NIFTI_INTENT_* code
    pub intent_code: i16,
    /// Defines the data type!
    pub datatype: i16,
    /// Number of bits per voxel
    pub bitpix: i16,
    /// First slice index
    pub slice_start: i16,
    /// Grid spacings
    pub pixdim: [f32; 8],
    /// Offset into .nii file to reach the volume
    pub vox_offset: f32,
    /// Data scaling: slope
    pub scl_slope: f32,
    /// Data scaling: offset
    pub scl_inter: f32,
    /// Last slice index
    pub slice_end: i16,
    /// Slice timing order
    pub slice_code: u8,
    /// Units of pixdim[1..4]
    pub xyzt_units: u8,
    /// Max display intensity
    pub cal_max: f32,
    /// Min display intensity
    pub cal_min: f32,
    /// Time for 1 slice
    pub slice_duration: f32,
    /// Time axis shift
    pub toffset: f32,
    /// Unused in NIFTI-1
    pub glmax: i32,
    /// Unused in NIFTI-1
    pub glmin: i32,

    /// Any text you like
    pub descrip: Vec<u8>,
    /// Auxiliary filename
    pub aux_file: [u8; 24],
    /// NIFTI_XFORM_* code
    pub qform_code: i16,
    /// NIFTI_XFORM_* code
    pub sform_code: i16,
    /// Quaternion b param
    pub quatern_b: f32,
    /// Quaternion c param
    pub quatern_c: f32,
    /// Quaternion d param
    pub quatern_d: f32,
    /// Quaternion x shift
    pub quatern_x: f32,
    /// Quaternion y shift
    pub quatern_y: f32,
    /// Quaternion z shift
    pub quatern_z: f32,

    /// 1st row affine transform
    pub srow_x: [f32; 4],
    /// 2nd row affine transform
    pub srow_y: [f32; 4],
    /// 3rd row affine transform
    pub srow_z: [f32; 4],

    /// 'name' or meaning of data
    pub intent_name: [u8; 16],

    /// Magic code. Must be `b"ni1\0"` or `b"n+1\0"`
    pub magic: [u8; 4],

    /// Original data Endianness
    pub endianness: Endianness,
}

impl Default for NiftiHeader {
    fn default() -> NiftiHeader {
        NiftiHeader {
            sizeof_hdr: HEADER_SIZE as i32,
            data_type: [0; 10],
            db_name: [0; 18],
            extents: 0,
            session_error: 0,
            regular: 0,
            dim_info: 0,
            dim: [1, 0, 0, 0, 0, 0, 0, 0],
            intent_p1: 0.,
            intent_p2: 0.,
            intent_p3: 0.,
            intent_code: 0,
            datatype: 0,
            bitpix: 0,
            slice_start: 0,
            pixdim: [0.; 8],
            vox_offset: 352.,
            scl_slope: 0.,
            scl_inter: 0.,
            slice_end: 0,
            slice_code: 0,
            xyzt_units: 0,
            cal_max: 0.,
            cal_min: 0.,
            slice_duration: 0.,
            toffset: 0.,
            glmax: 0,
            glmin: 0,

            descrip: vec![0; 80],
            aux_file: [0; 24],
            qform_code: 0,
            sform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            quatern_x: 0.,
            quatern_y: 0.,
            quatern_z: 0.,

            srow_x: [0.; 4],
            srow_y: [0.; 4],
            srow_z: [0.; 4],

            intent_name: [0; 16],

            magic: *MAGIC_CODE_NIP1,

            endianness: Endianness::Little,
        }
    }
}

impl NiftiHeader {
    /// Read a NIfTI-1 header from the start of a decompressed byte buffer.
    /// The input buffer is left untouched.
    ///
    /// # Errors
    ///
    /// - `NiftiError::InvalidFormat` if the buffer is shorter than a header,
    ///   or does not carry a NIfTI-1 signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<NiftiHeader> {
        if !is_nifti1(bytes) {
            return Err(NiftiError::InvalidFormat);
        }
        let endianness = detect_endianness(&bytes[..HEADER_SIZE])?;
        parse_header(&bytes[..HEADER_SIZE], endianness)
    }

    /// Read a NIfTI-1 header from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// NIFTI header.
    pub fn from_stream<S: Read>(mut input: S) -> Result<NiftiHeader> {
        let mut buf = vec![0u8; HEADER_SIZE];
        input.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                NiftiError::InvalidFormat
            } else {
                NiftiError::Io(e)
            }
        })?;
        NiftiHeader::from_bytes(&buf)
    }

    /// Whether this header describes a header-only file, whose image
    /// data lives in a separate ".img" file.
    pub fn is_header_only(&self) -> bool {
        &self.magic == MAGIC_CODE_NI1
    }

    /// Get the data type as a validated enum.
    pub fn data_type(&self) -> Result<NiftiType> {
        FromPrimitive::from_i16(self.datatype)
            .ok_or(NiftiError::InvalidCode("datatype", self.datatype))
    }

    /// Get the spatial units type as a validated unit enum.
    pub fn xyzt_to_space(&self) -> Result<Unit> {
        let space_code = self.xyzt_units & 0o0007;
        FromPrimitive::from_u8(space_code)
            .ok_or(NiftiError::InvalidCode("xyzt units (space)", space_code as i16))
    }

    /// Get the qform coordinate mapping method as a validated enum.
    pub fn qform(&self) -> Result<XForm> {
        FromPrimitive::from_i16(self.qform_code)
            .ok_or(NiftiError::InvalidCode("qform", self.qform_code))
    }

    /// Get the sform coordinate mapping method as a validated enum.
    pub fn sform(&self) -> Result<XForm> {
        FromPrimitive::from_i16(self.sform_code)
            .ok_or(NiftiError::InvalidCode("sform", self.sform_code))
    }

    /// Get the description field as text, up to the first NUL byte.
    pub fn description(&self) -> String {
        let end = self
            .descrip
            .iter()
            .position(|b| *b == 0)
            .unwrap_or_else(|| self.descrip.len());
        String::from_utf8_lossy(&self.descrip[..end]).into_owned()
    }

    /// Validate and retrieve the three spatial dimensions. Axes beyond
    /// `dim[0]` count as 1, so that 2-D images become a single slice.
    ///
    /// # Errors
    ///
    /// - `NiftiError::InconsistentDim` if `dim[0]` is outside `1..=7`, or a
    ///   used spatial dimension is not positive.
    pub fn spatial_dim(&self) -> Result<[usize; 3]> {
        let ndim = self.dim[0];
        if !(1..=7).contains(&ndim) {
            return Err(NiftiError::InconsistentDim(0, ndim as i64));
        }
        let mut out = [1usize; 3];
        for (axis, d) in out.iter_mut().enumerate() {
            let index = axis + 1;
            if index as i16 > ndim {
                break;
            }
            let value = self.dim[index];
            if value <= 0 {
                return Err(NiftiError::InconsistentDim(index as u8, value as i64));
            }
            *d = value as usize;
        }
        Ok(out)
    }
}

/// Check whether the buffer starts with a NIfTI-1 header, by its signature.
pub fn is_nifti1(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE {
        return false;
    }
    let magic = &bytes[MAGIC_OFFSET..MAGIC_OFFSET + 4];
    magic == MAGIC_CODE_NIP1 || magic == MAGIC_CODE_NI1
}

/// Find the byte order of the header: `sizeof_hdr` must read 348,
/// otherwise `dim[0]` must be a plausible dimensionality.
fn detect_endianness(bytes: &[u8]) -> Result<Endianness> {
    let sizeof_hdr = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if i32::from_le_bytes(sizeof_hdr) == HEADER_SIZE as i32 {
        return Ok(Endianness::Little);
    }
    if i32::from_be_bytes(sizeof_hdr) == HEADER_SIZE as i32 {
        return Ok(Endianness::Big);
    }

    let dim0 = [bytes[40], bytes[41]];
    if (1..=7).contains(&i16::from_le_bytes(dim0)) {
        Ok(Endianness::Little)
    } else if (1..=7).contains(&i16::from_be_bytes(dim0)) {
        Ok(Endianness::Big)
    } else {
        Err(NiftiError::InvalidFormat)
    }
}

fn parse_header(bytes: &[u8], endianness: Endianness) -> Result<NiftiHeader> {
    let mut h = NiftiHeader::default();
    let mut input = ByteOrdered::runtime(bytes, endianness);

    h.sizeof_hdr = input.read_i32()?;
    input.read_exact(&mut h.data_type)?;
    input.read_exact(&mut h.db_name)?;
    h.extents = input.read_i32()?;
    h.session_error = input.read_i16()?;
    h.regular = input.read_u8()?;
    h.dim_info = input.read_u8()?;
    for v in &mut h.dim {
        *v = input.read_i16()?;
    }
    h.intent_p1 = input.read_f32()?;
    h.intent_p2 = input.read_f32()?;
    h.intent_p3 = input.read_f32()?;
    h.intent_code = input.read_i16()?;
    h.datatype = input.read_i16()?;
    h.bitpix = input.read_i16()?;
    h.slice_start = input.read_i16()?;
    for v in &mut h.pixdim {
        *v = input.read_f32()?;
    }
    h.vox_offset = input.read_f32()?;
    h.scl_slope = input.read_f32()?;
    h.scl_inter = input.read_f32()?;
    h.slice_end = input.read_i16()?;
    h.slice_code = input.read_u8()?;
    h.xyzt_units = input.read_u8()?;
    h.cal_max = input.read_f32()?;
    h.cal_min = input.read_f32()?;
    h.slice_duration = input.read_f32()?;
    h.toffset = input.read_f32()?;
    h.glmax = input.read_i32()?;
    h.glmin = input.read_i32()?;

    // descrip is 80-elem vec already
    input.read_exact(h.descrip.as_mut_slice())?;
    input.read_exact(&mut h.aux_file)?;
    h.qform_code = input.read_i16()?;
    h.sform_code = input.read_i16()?;
    h.quatern_b = input.read_f32()?;
    h.quatern_c = input.read_f32()?;
    h.quatern_d = input.read_f32()?;
    h.quatern_x = input.read_f32()?;
    h.quatern_y = input.read_f32()?;
    h.quatern_z = input.read_f32()?;
    for v in &mut h.srow_x {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_y {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_z {
        *v = input.read_f32()?;
    }
    input.read_exact(&mut h.intent_name)?;
    input.read_exact(&mut h.magic)?;
    h.endianness = endianness;

    debug_assert_eq!(h.descrip.len(), 80);

    if &h.magic != MAGIC_CODE_NI1 && &h.magic != MAGIC_CODE_NIP1 {
        Err(NiftiError::InvalidFormat)
    } else {
        Ok(h)
    }
}
