//! Types for error handling go here.

use crate::typedef::NiftiType;
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiftiError {
        /// The source of the volume bytes could not be read.
        Fetch(location: String, err: IOError) {
            display("Failed to fetch volume from {}: {}", location, err)
            source(err)
        }
        /// The payload claims to be gzip-compressed but could not be inflated.
        Decompression(err: IOError) {
            display("Failed to decompress gzip payload: {}", err)
            source(err)
        }
        /// Invalid NIfTI-1 payload: signature or header size check failed.
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// The payload only holds a header (`ni1`), the image lives elsewhere.
        NoVolumeData {
            display("No volume data available")
        }
        /// Valid data type code, but not a scalar type supported by this crate.
        UnsupportedDataType(t: NiftiType) {
            display("Unsupported data type {:?}", t)
        }
        /// A header code field holds an unknown value.
        InvalidCode(typename: &'static str, code: i16) {
            display("Invalid code `{}` for header field {}", code, typename)
        }
        /// A spatial dimension is zero or negative.
        InconsistentDim(index: u8, value: i64) {
            display("Inconsistent value `{}` in header field dim[{}]", value, index)
        }
        /// Payload length does not match what the dimensions require.
        IncompatibleLength(expected: usize, got: usize) {
            display("Expected {} bytes/samples of volume data, got {}", expected, got)
        }
        /// Voxel spacing must be finite and strictly positive.
        InvalidSpacing(spacing: [f32; 3]) {
            display("Invalid voxel spacing {:?}", spacing)
        }
        /// A line in a plain-text atlas label list could not be parsed.
        InvalidLabelLine(line: usize, text: String) {
            display("Invalid atlas label at line {}: {:?}", line, text)
        }
        /// I/O error while reading atlas data
        Io(err: IOError) {
            from()
            source(err)
        }
        /// Malformed atlas label table or configuration
        Json(err: serde_json::Error) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
