#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_atlas::{decode_volume, extract_isosurface};

fuzz_target!(|data: &[u8]| {
    if let Ok(volume) = decode_volume(data, "fuzz.nii") {
        if let Some((min, max)) = volume.value_range().bounds() {
            let _ = extract_isosurface(&volume, min);
            let _ = extract_isosurface(&volume, (min + max) / 2.);
        }
    }
});
