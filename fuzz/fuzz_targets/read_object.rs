#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_atlas::ReaderOptions;

fuzz_target!(|data: &[u8]| {
    let _ = ReaderOptions::new().sniff_gzip(true).read_bytes(data, "fuzz.nii");
});
