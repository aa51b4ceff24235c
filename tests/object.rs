mod util;

use nifti_atlas::{
    decode_volume, load_volume, Endianness, NiftiError, NiftiHeader, NiftiType, ReaderOptions,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use util::{encode_f32, encode_header, encode_i16, gzip, nifti_bytes, ramp_nii, volume_header};

#[test]
fn ramp_nii_plain() {
    let bytes = ramp_nii(Endianness::Little);
    let obj = ReaderOptions::new().read_bytes(&bytes, "ramp.nii").unwrap();
    assert_eq!(obj.header().data_type().unwrap(), NiftiType::Float32);
    assert_eq!(obj.header().dim, [3, 2, 3, 4, 1, 1, 1, 1]);

    let volume = obj.into_volume();
    assert_eq!(volume.dim(), [2, 3, 4]);
    assert_eq!(volume.spacing(), [2., 2., 2.]);
    assert_eq!(volume.data().len(), 24);
    assert_eq!(volume.get([1, 0, 0]), Some(1.));
    assert_eq!(volume.get([0, 1, 0]), Some(2.));
    assert_eq!(volume.get([0, 0, 1]), Some(6.));
    assert_eq!(volume.get([1, 2, 3]), Some(23.));
    assert_eq!(volume.value_range().bounds(), Some((1., 23.)));
}

#[test]
fn gzip_and_plain_decode_the_same() {
    let bytes = ramp_nii(Endianness::Little);
    let compressed = gzip(&bytes);
    let copy = compressed.clone();

    let plain = decode_volume(&bytes, "ramp.nii").unwrap();
    let inflated = decode_volume(&compressed, "ramp.nii.gz").unwrap();
    assert_eq!(plain.dim(), inflated.dim());
    assert_eq!(plain.spacing(), inflated.spacing());
    assert_eq!(plain.data(), inflated.data());
    assert_eq!(plain, inflated);
    // the input is left as it was
    assert_eq!(compressed, copy);
}

#[test]
fn big_endian_matches_little_endian() {
    let le = decode_volume(&ramp_nii(Endianness::Little), "le.nii").unwrap();
    let be = decode_volume(&ramp_nii(Endianness::Big), "be.nii").unwrap();
    assert_eq!(be.header().endianness, Endianness::Big);
    assert_eq!(le.data(), be.data());
    assert_eq!(le.dim(), be.dim());
}

#[test]
fn gzip_detected_by_magic_only_when_sniffing() {
    let compressed = gzip(&ramp_nii(Endianness::Little));
    match ReaderOptions::new().read_bytes(&compressed, "download") {
        Err(NiftiError::InvalidFormat) => {}
        other => panic!("expected invalid format, got {:?}", other),
    }
    let volume = ReaderOptions::new()
        .sniff_gzip(true)
        .read_bytes(&compressed, "download")
        .unwrap()
        .into_volume();
    assert_eq!(volume.dim(), [2, 3, 4]);

    // sniffing changes nothing for named or plain payloads
    let mut sniffing = ReaderOptions::new();
    sniffing.sniff_gzip(true);
    let named = sniffing.read_bytes(&compressed, "ramp.nii.gz").unwrap();
    assert_eq!(named.into_volume(), volume);
    let plain = ramp_nii(Endianness::Little);
    let plain = sniffing.read_bytes(&plain, "ramp.nii").unwrap();
    assert_eq!(plain.into_volume(), volume);
    match sniffing.read_bytes(b"not gzip", "ramp.nii.gz") {
        Err(NiftiError::Decompression(_)) => {}
        other => panic!("expected decompression error, got {:?}", other),
    }
}

#[test]
fn corrupt_gzip_is_a_decompression_error() {
    let mut compressed = gzip(&ramp_nii(Endianness::Little));
    // CRC32 lives in the 8-byte trailer
    let crc = compressed.len() - 8;
    compressed[crc] ^= 0xff;
    match decode_volume(&compressed, "ramp.nii.gz") {
        Err(NiftiError::Decompression(_)) => {}
        other => panic!("expected decompression error, got {:?}", other),
    }

    match decode_volume(b"definitely not gzip", "ramp.nii.gz") {
        Err(NiftiError::Decompression(_)) => {}
        other => panic!("expected decompression error, got {:?}", other),
    }
}

#[test]
fn bad_signature_is_invalid_format() {
    let mut bytes = ramp_nii(Endianness::Little);
    bytes[344..348].copy_from_slice(b"n+2\0");
    match decode_volume(&bytes, "ramp.nii") {
        Err(NiftiError::InvalidFormat) => {}
        other => panic!("expected invalid format, got {:?}", other),
    }

    for bytes in &[&b""[..], &[0u8; 100][..], &[0u8; 400][..]] {
        match decode_volume(bytes, "empty.nii") {
            Err(NiftiError::InvalidFormat) => {}
            other => panic!("expected invalid format, got {:?}", other),
        }
    }
}

#[test]
fn header_only_payload() {
    let header = NiftiHeader {
        magic: *b"ni1\0",
        vox_offset: 0.,
        ..volume_header([2, 2, 2], NiftiType::Uint8, [1., 1., 1.])
    };
    match decode_volume(&encode_header(&header), "brain.hdr") {
        Err(NiftiError::NoVolumeData) => {}
        other => panic!("expected no volume data, got {:?}", other),
    }
}

#[test]
fn unsupported_data_types() {
    let header = volume_header([2, 2, 1], NiftiType::Rgb24, [1., 1., 1.]);
    let bytes = nifti_bytes(&header, &[0u8; 12]);
    match decode_volume(&bytes, "rgb.nii") {
        Err(NiftiError::UnsupportedDataType(NiftiType::Rgb24)) => {}
        other => panic!("expected unsupported data type, got {:?}", other),
    }

    let header = NiftiHeader {
        datatype: 3,
        ..volume_header([2, 2, 1], NiftiType::Uint8, [1., 1., 1.])
    };
    match decode_volume(&nifti_bytes(&header, &[0u8; 4]), "odd.nii") {
        Err(NiftiError::InvalidCode("datatype", 3)) => {}
        other => panic!("expected invalid datatype code, got {:?}", other),
    }
}

#[test]
fn truncated_image() {
    let mut bytes = ramp_nii(Endianness::Little);
    let len = bytes.len();
    bytes.truncate(len - 2);
    match decode_volume(&bytes, "ramp.nii") {
        Err(NiftiError::IncompatibleLength(96, 94)) => {}
        other => panic!("expected incompatible length, got {:?}", other),
    }
}

#[test]
fn bad_dimensions() {
    let header = volume_header([4, 0, 4], NiftiType::Uint8, [1., 1., 1.]);
    match decode_volume(&nifti_bytes(&header, &[]), "flat.nii") {
        Err(NiftiError::InconsistentDim(2, 0)) => {}
        other => panic!("expected inconsistent dim, got {:?}", other),
    }
}

#[test]
fn scaling() {
    let header = NiftiHeader {
        scl_slope: 0.5,
        scl_inter: 10.,
        ..volume_header([2, 2, 1], NiftiType::Int16, [1., 1., 1.])
    };
    let bytes = nifti_bytes(&header, &encode_i16(&[0, 2, -4, 100], Endianness::Little));

    let volume = decode_volume(&bytes, "scaled.nii").unwrap();
    assert_eq!(volume.data(), &[10., 11., 8., 60.]);

    let volume = ReaderOptions::new()
        .apply_scaling(false)
        .read_bytes(&bytes, "scaled.nii")
        .unwrap()
        .into_volume();
    assert_eq!(volume.data(), &[0., 2., -4., 100.]);
}

#[test]
fn zero_slope_means_no_scaling() {
    let header = NiftiHeader {
        scl_slope: 0.,
        scl_inter: 10.,
        ..volume_header([2, 1, 1], NiftiType::Int16, [1., 1., 1.])
    };
    let bytes = nifti_bytes(&header, &encode_i16(&[3, 4], Endianness::Little));
    assert_eq!(decode_volume(&bytes, "raw.nii").unwrap().data(), &[3., 4.]);
}

#[test]
fn four_dimensional_keeps_first_frame() {
    let header = NiftiHeader {
        dim: [4, 2, 1, 1, 3, 1, 1, 1],
        ..volume_header([2, 1, 1], NiftiType::Float32, [1., 1., 1.])
    };
    let samples = encode_f32(&[1., 2., 3., 4., 5., 6.], Endianness::Little);
    let volume = decode_volume(&nifti_bytes(&header, &samples), "bold.nii").unwrap();
    assert_eq!(volume.dim(), [2, 1, 1]);
    assert_eq!(volume.data(), &[1., 2.]);
}

#[test]
fn zero_spacing_becomes_one() {
    let header = volume_header([2, 1, 1], NiftiType::Float32, [0., 1.5, std::f32::NAN]);
    let samples = encode_f32(&[1., 2.], Endianness::Little);
    let volume = decode_volume(&nifti_bytes(&header, &samples), "odd.nii").unwrap();
    assert_eq!(volume.spacing(), [1., 1.5, 1.]);
}

#[test]
fn all_background_volume() {
    let header = volume_header([2, 2, 2], NiftiType::Uint8, [1., 1., 1.]);
    let volume = decode_volume(&nifti_bytes(&header, &[0u8; 8]), "empty.nii").unwrap();
    assert!(volume.value_range().is_empty());
    assert_eq!(volume.value_range().bounds(), None);
}

#[test]
fn from_file() {
    let dir = tempfile::tempdir().unwrap();
    let plain_path = dir.path().join("ramp.nii");
    let gz_path = dir.path().join("ramp.nii.gz");
    let bytes = ramp_nii(Endianness::Little);
    std::fs::File::create(&plain_path)
        .unwrap()
        .write_all(&bytes)
        .unwrap();
    std::fs::File::create(&gz_path)
        .unwrap()
        .write_all(&gzip(&bytes))
        .unwrap();

    let plain = load_volume(&plain_path).unwrap();
    let inflated = ReaderOptions::new().read_file(&gz_path).unwrap().into_volume();
    assert_eq!(plain, inflated);

    match load_volume(dir.path().join("missing.nii")) {
        Err(NiftiError::Fetch(location, _)) => assert!(location.ends_with("missing.nii")),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[test]
fn from_reader() {
    let bytes = gzip(&ramp_nii(Endianness::Big));
    let obj = ReaderOptions::new()
        .read_reader(&bytes[..], "ramp.nii.gz")
        .unwrap();
    assert_eq!(obj.volume().dim(), [2, 3, 4]);
}

#[cfg(feature = "ndarray_volumes")]
#[test]
fn into_ndarray() {
    use nifti_atlas::IntoNdArray;

    let volume = decode_volume(&ramp_nii(Endianness::Little), "ramp.nii").unwrap();
    let array = volume.into_ndarray();
    assert_eq!(array.shape(), &[2, 3, 4]);
    assert_eq!(array[[1, 0, 0]], 1.);
    assert_eq!(array[[0, 1, 0]], 2.);
    assert_eq!(array[[1, 2, 3]], 23.);
}
