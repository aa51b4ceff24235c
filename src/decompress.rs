//! Inflating of gzip-compressed volume payloads.
//!
//! Volumes are fetched whole, so this works on fully buffered payloads
//! rather than streams.

use crate::error::{NiftiError, Result};
use crate::util::is_gz_file;
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;

/// The two leading bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether the source identifier (file name, path or URL) indicates
/// a gzip-compressed payload, which is conventionally a `.gz` suffix.
pub fn is_gz_source(source: &str) -> bool {
    let path = source
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(source);
    is_gz_file(path)
}

/// Check whether the buffer starts with the gzip magic bytes.
pub fn has_gzip_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Inflate the payload if the source identifier says it is gzip-compressed,
/// otherwise hand the very same bytes back.
///
/// # Errors
///
/// - `NiftiError::Decompression` if inflating fails, which includes a
///   payload named `.gz` that is not gzip at all.
pub fn decompress<'a>(bytes: &'a [u8], source: &str) -> Result<Cow<'a, [u8]>> {
    if is_gz_source(source) {
        inflate(bytes).map(Cow::Owned)
    } else {
        Ok(Cow::Borrowed(bytes))
    }
}

/// Inflate a complete gzip payload.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(4));
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(NiftiError::Decompression)?;
    Ok(out)
}
