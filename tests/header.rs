mod util;

use nifti_atlas::error::NiftiError;
use nifti_atlas::header::{is_nifti1, MAGIC_CODE_NI1};
use nifti_atlas::{Endianness, NiftiHeader, NiftiType, Unit, XForm};
use pretty_assertions::assert_eq;
use util::{encode_header, gzip, volume_header};

fn mni_header(endianness: Endianness) -> NiftiHeader {
    let mut descrip = b"MNI152 2mm".to_vec();
    descrip.resize(80, 0);
    NiftiHeader {
        xyzt_units: 2 | 8,
        qform_code: 4,
        sform_code: 4,
        srow_x: [-2., 0., 0., 90.],
        srow_y: [0., 2., 0., -126.],
        srow_z: [0., 0., 2., -72.],
        descrip,
        endianness,
        ..volume_header([91, 109, 91], NiftiType::Int16, [2., 2., 2.])
    }
}

#[test]
fn little_endian_header() {
    let header = mni_header(Endianness::Little);
    let parsed = NiftiHeader::from_bytes(&encode_header(&header)).unwrap();
    assert_eq!(parsed, header);
    assert_eq!(parsed.data_type().unwrap(), NiftiType::Int16);
    assert_eq!(parsed.spatial_dim().unwrap(), [91, 109, 91]);
    assert_eq!(parsed.xyzt_to_space().unwrap(), Unit::Mm);
    assert_eq!(parsed.qform().unwrap(), XForm::Mni152);
    assert_eq!(parsed.sform().unwrap(), XForm::Mni152);
    assert_eq!(parsed.description(), "MNI152 2mm");
    assert!(!parsed.is_header_only());
}

#[test]
fn big_endian_header() {
    let header = mni_header(Endianness::Big);
    let parsed = NiftiHeader::from_bytes(&encode_header(&header)).unwrap();
    assert_eq!(parsed.endianness, Endianness::Big);
    assert_eq!(parsed, header);
}

#[test]
fn header_from_stream() {
    let header = mni_header(Endianness::Little);
    let bytes = encode_header(&header);
    let parsed = NiftiHeader::from_stream(&bytes[..]).unwrap();
    assert_eq!(parsed, header);

    match NiftiHeader::from_stream(&bytes[..200]) {
        Err(NiftiError::InvalidFormat) => {}
        other => panic!("expected invalid format, got {:?}", other),
    }
}

#[test]
fn header_only_file() {
    let header = NiftiHeader {
        magic: *MAGIC_CODE_NI1,
        vox_offset: 0.,
        ..mni_header(Endianness::Big)
    };
    let parsed = NiftiHeader::from_bytes(&encode_header(&header)).unwrap();
    assert!(parsed.is_header_only());
}

#[test]
fn signature() {
    let bytes = encode_header(&mni_header(Endianness::Little));
    assert!(is_nifti1(&bytes));
    assert!(!is_nifti1(&bytes[..347]));
    // a compressed payload must be inflated first
    assert!(!is_nifti1(&gzip(&bytes)));

    let mut nifti2 = bytes.clone();
    nifti2[344..348].copy_from_slice(b"n+2\0");
    assert!(!is_nifti1(&nifti2));
    match NiftiHeader::from_bytes(&nifti2) {
        Err(NiftiError::InvalidFormat) => {}
        other => panic!("expected invalid format, got {:?}", other),
    }
}

#[test]
fn invalid_codes() {
    let header = NiftiHeader {
        datatype: 9,
        qform_code: 7,
        xyzt_units: 5,
        ..mni_header(Endianness::Little)
    };
    let parsed = NiftiHeader::from_bytes(&encode_header(&header)).unwrap();
    match parsed.data_type() {
        Err(NiftiError::InvalidCode("datatype", 9)) => {}
        other => panic!("expected invalid code, got {:?}", other),
    }
    assert!(parsed.qform().is_err());
    assert!(parsed.xyzt_to_space().is_err());
}

#[test]
fn spatial_dims_of_lower_dimensional_images() {
    let header = NiftiHeader {
        dim: [2, 64, 32, 0, 0, 0, 0, 0],
        ..NiftiHeader::default()
    };
    assert_eq!(header.spatial_dim().unwrap(), [64, 32, 1]);

    let header = NiftiHeader {
        dim: [0, 64, 32, 8, 0, 0, 0, 0],
        ..NiftiHeader::default()
    };
    match header.spatial_dim() {
        Err(NiftiError::InconsistentDim(0, 0)) => {}
        other => panic!("expected inconsistent dim, got {:?}", other),
    }

    let header = NiftiHeader {
        dim: [3, 64, -2, 8, 0, 0, 0, 0],
        ..NiftiHeader::default()
    };
    match header.spatial_dim() {
        Err(NiftiError::InconsistentDim(2, -2)) => {}
        other => panic!("expected inconsistent dim, got {:?}", other),
    }
}
