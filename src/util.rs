//! Private utility module
use std::path::Path;

pub use byteordered::Endianness;

/// Convert a raw volume value to the scale defined
/// by the given scale slope and intercept parameters.
/// A slope of zero (or a non-finite one) means that no scaling applies.
pub fn raw_to_value(value: f32, slope: f32, intercept: f32) -> f32 {
    if slope != 0. && slope.is_finite() {
        value * slope + intercept
    } else {
        value
    }
}

/// Check whether the given source name refers to a gzip-compressed payload.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}
