#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_atlas::NiftiHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_bytes(data) {
        let _ = header.spatial_dim();
        let _ = header.data_type();
        let _ = header.qform();
        let _ = header.sform();
        let _ = header.xyzt_to_space();
        let _ = header.description();
        let _ = header.affine();
    }
});
