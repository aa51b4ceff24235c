use byteordered::ByteOrdered;
use flate2::write::GzEncoder;
use flate2::Compression;
use nifti_atlas::{Endianness, NiftiHeader, NiftiType};
use std::io::Write;

/// Header of a single-file volume with the given shape and type,
/// no orientation and no scaling.
#[allow(dead_code)]
pub fn volume_header(dim: [i16; 3], datatype: NiftiType, pixdim: [f32; 3]) -> NiftiHeader {
    NiftiHeader {
        dim: [3, dim[0], dim[1], dim[2], 1, 1, 1, 1],
        datatype: datatype as i16,
        bitpix: (datatype.size_of() * 8) as i16,
        pixdim: [1., pixdim[0], pixdim[1], pixdim[2], 0., 0., 0., 0.],
        vox_offset: 352.,
        ..NiftiHeader::default()
    }
}

/// Encode a header in its own byte order, followed by the 4 bytes of the
/// empty extension flag.
#[allow(dead_code)]
pub fn encode_header(header: &NiftiHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(352);
    {
        let mut w = ByteOrdered::runtime(&mut out, header.endianness);
        w.write_i32(header.sizeof_hdr).unwrap();
        w.write_all(&header.data_type).unwrap();
        w.write_all(&header.db_name).unwrap();
        w.write_i32(header.extents).unwrap();
        w.write_i16(header.session_error).unwrap();
        w.write_u8(header.regular).unwrap();
        w.write_u8(header.dim_info).unwrap();
        for d in &header.dim {
            w.write_i16(*d).unwrap();
        }
        w.write_f32(header.intent_p1).unwrap();
        w.write_f32(header.intent_p2).unwrap();
        w.write_f32(header.intent_p3).unwrap();
        w.write_i16(header.intent_code).unwrap();
        w.write_i16(header.datatype).unwrap();
        w.write_i16(header.bitpix).unwrap();
        w.write_i16(header.slice_start).unwrap();
        for f in &header.pixdim {
            w.write_f32(*f).unwrap();
        }
        w.write_f32(header.vox_offset).unwrap();
        w.write_f32(header.scl_slope).unwrap();
        w.write_f32(header.scl_inter).unwrap();
        w.write_i16(header.slice_end).unwrap();
        w.write_u8(header.slice_code).unwrap();
        w.write_u8(header.xyzt_units).unwrap();
        w.write_f32(header.cal_max).unwrap();
        w.write_f32(header.cal_min).unwrap();
        w.write_f32(header.slice_duration).unwrap();
        w.write_f32(header.toffset).unwrap();
        w.write_i32(header.glmax).unwrap();
        w.write_i32(header.glmin).unwrap();
        w.write_all(&header.descrip).unwrap();
        w.write_all(&header.aux_file).unwrap();
        w.write_i16(header.qform_code).unwrap();
        w.write_i16(header.sform_code).unwrap();
        for f in &[
            header.quatern_b,
            header.quatern_c,
            header.quatern_d,
            header.quatern_x,
            header.quatern_y,
            header.quatern_z,
        ] {
            w.write_f32(*f).unwrap();
        }
        for f in header.srow_x.iter().chain(&header.srow_y).chain(&header.srow_z) {
            w.write_f32(*f).unwrap();
        }
        w.write_all(&header.intent_name).unwrap();
        w.write_all(&header.magic).unwrap();
        w.write_u32(0).unwrap();
    }
    assert_eq!(out.len(), 352);
    out
}

/// Samples as `f32` in the given byte order.
#[allow(dead_code)]
pub fn encode_f32(values: &[f32], endianness: Endianness) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut w = ByteOrdered::runtime(&mut out, endianness);
        for v in values {
            w.write_f32(*v).unwrap();
        }
    }
    out
}

/// Samples as `i16` in the given byte order.
#[allow(dead_code)]
pub fn encode_i16(values: &[i16], endianness: Endianness) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut w = ByteOrdered::runtime(&mut out, endianness);
        for v in values {
            w.write_i16(*v).unwrap();
        }
    }
    out
}

/// A complete single-file NIfTI-1 payload.
#[allow(dead_code)]
pub fn nifti_bytes(header: &NiftiHeader, samples: &[u8]) -> Vec<u8> {
    let mut out = encode_header(header);
    out.extend_from_slice(samples);
    out
}

/// A small float volume, the 2x3x4 ramp `0, 1, ..., 23` with 2mm voxels.
#[allow(dead_code)]
pub fn ramp_nii(endianness: Endianness) -> Vec<u8> {
    let header = NiftiHeader {
        endianness,
        ..volume_header([2, 3, 4], NiftiType::Float32, [2., 2., 2.])
    };
    let values: Vec<f32> = (0..24).map(|v| v as f32).collect();
    nifti_bytes(&header, &encode_f32(&values, endianness))
}

/// Gzip a buffer.
#[allow(dead_code)]
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}
