//! Module for decoding complete NIfTI-1 objects from a byte payload.
//!
//! The whole payload is expected to be available in memory, as when it
//! was fetched from a URL or read from a file. Decoding goes through the
//! same steps every time: inflating when the source is gzip-compressed,
//! parsing the header, then converting the first 3-D frame of the image
//! into `f32` samples.

use crate::decompress::{decompress, has_gzip_magic, inflate, is_gz_source};
use crate::error::{NiftiError, Result};
use crate::header::{NiftiHeader, HEADER_SIZE};
use crate::util::raw_to_value;
use crate::volume::element::decode_samples;
use crate::volume::Volume;
use log::{debug, warn};
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

/// Smallest offset of the image in a single-file NIfTI-1 payload:
/// the header plus the 4-byte extension flag.
const MIN_VOX_OFFSET: usize = HEADER_SIZE + 4;

/// Options and flags which can be used to configure how a NIfTI payload is
/// decoded.
///
/// # Example
///
/// ```no_run
/// use nifti_atlas::ReaderOptions;
/// # use nifti_atlas::error::Result;
///
/// # fn run() -> Result<()> {
/// let obj = ReaderOptions::new()
///     .sniff_gzip(true)
///     .read_file("resources/minimal.nii")?;
/// println!("{:?}", obj.volume().dim());
/// # Ok(())
/// # }
/// # run().unwrap()
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Also inflate payloads starting with the gzip magic bytes,
    /// whatever the source name.
    sniff_gzip: bool,
    /// Apply `scl_slope` and `scl_inter` to the samples.
    apply_scaling: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            sniff_gzip: false,
            apply_scaling: true,
        }
    }
}

impl ReaderOptions {
    /// Creates a blank new set of options ready for configuration.
    pub fn new() -> ReaderOptions {
        ReaderOptions::default()
    }

    /// Sets the option for detecting gzip payloads by their leading magic
    /// bytes, in addition to a `.gz` source name. Disabled by default.
    pub fn sniff_gzip(&mut self, sniff_gzip: bool) -> &mut Self {
        self.sniff_gzip = sniff_gzip;
        self
    }

    /// Sets the option for applying the header's scaling parameters to the
    /// decoded samples. Enabled by default.
    pub fn apply_scaling(&mut self, apply_scaling: bool) -> &mut Self {
        self.apply_scaling = apply_scaling;
        self
    }

    /// Decode a NIfTI object from the contents of a file.
    /// A `.gz` file name means that the file is gzip-compressed.
    ///
    /// # Errors
    ///
    /// - `NiftiError::Fetch` if the file cannot be read.
    /// - any error from [`read_bytes`](#method.read_bytes).
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<NiftiObject> {
        let path = path.as_ref();
        let source = path.to_string_lossy();
        let bytes =
            std::fs::read(path).map_err(|e| NiftiError::Fetch(source.to_string(), e))?;
        self.read_bytes(&bytes, &source)
    }

    /// Decode a NIfTI object from all the bytes of a reader. The source
    /// identifier (file name or URL) tells whether the bytes are
    /// gzip-compressed.
    ///
    /// # Errors
    ///
    /// - `NiftiError::Fetch` if reading fails.
    /// - any error from [`read_bytes`](#method.read_bytes).
    pub fn read_reader<R: Read>(&self, mut reader: R, source: &str) -> Result<NiftiObject> {
        let mut bytes = Vec::new();
        let _ = reader
            .read_to_end(&mut bytes)
            .map_err(|e| NiftiError::Fetch(source.to_string(), e))?;
        self.read_bytes(&bytes, source)
    }

    /// Decode a NIfTI object from a fully buffered payload. The source
    /// identifier (file name or URL) tells whether the bytes are
    /// gzip-compressed. The input buffer is never modified.
    ///
    /// # Errors
    ///
    /// - `NiftiError::Decompression` if the payload should be gzip but
    ///   cannot be inflated.
    /// - `NiftiError::InvalidFormat` if the payload is not NIfTI-1.
    /// - `NiftiError::NoVolumeData` if the header says the image lives in
    ///   a separate file.
    /// - `NiftiError::UnsupportedDataType` for non-scalar voxels.
    /// - `NiftiError::IncompatibleLength` if the image is truncated.
    pub fn read_bytes(&self, bytes: &[u8], source: &str) -> Result<NiftiObject> {
        let payload: Cow<[u8]> =
            if self.sniff_gzip && !is_gz_source(source) && has_gzip_magic(bytes) {
                debug!("{}: gzip magic found, inflating", source);
                Cow::Owned(inflate(bytes)?)
            } else {
                decompress(bytes, source)?
            };
        let gz = matches!(payload, Cow::Owned(_));

        let header = NiftiHeader::from_bytes(&payload)?;
        if header.is_header_only() {
            return Err(NiftiError::NoVolumeData);
        }
        let datatype = header.data_type()?;
        if !datatype.is_scalar() {
            return Err(NiftiError::UnsupportedDataType(datatype));
        }

        let dim = header.spatial_dim()?;
        let count = dim[0] * dim[1] * dim[2];
        let frames = frame_count(&header);
        if frames > 1 {
            warn!(
                "{}: volume has {} frames, only the first one is kept",
                source, frames
            );
        }

        let offset = vox_offset(&header);
        let image = payload.get(offset..).unwrap_or(&[]);
        let mut samples = decode_samples(datatype, image, count, header.endianness)
            .map_err(|e| match e {
                NiftiError::IncompatibleLength(..) => {
                    NiftiError::IncompatibleLength(count * datatype.size_of(), image.len())
                }
                e => e,
            })?;

        if self.apply_scaling {
            let (slope, inter) = (header.scl_slope, header.scl_inter);
            if slope != 0. && slope.is_finite() && !(slope == 1. && inter == 0.) {
                for v in &mut samples {
                    *v = raw_to_value(*v, slope, inter);
                }
            }
        }

        debug!(
            "{}: decoded {:?} volume of {}x{}x{} ({} payload bytes{})",
            source,
            datatype,
            dim[0],
            dim[1],
            dim[2],
            payload.len(),
            if gz { ", inflated" } else { "" }
        );

        let volume = Volume::from_header(header, samples)?;
        Ok(NiftiObject { volume })
    }
}

/// Number of 3-D frames declared by the dimensions beyond the third.
fn frame_count(header: &NiftiHeader) -> usize {
    let ndim = header.dim[0].max(0).min(7) as usize;
    header.dim[1..=ndim]
        .iter()
        .skip(3)
        .map(|d| (*d).max(1) as usize)
        .product()
}

/// Byte offset of the image data, never inside the header.
fn vox_offset(header: &NiftiHeader) -> usize {
    let offset = header.vox_offset;
    if offset.is_finite() && offset as usize >= MIN_VOX_OFFSET {
        offset as usize
    } else {
        MIN_VOX_OFFSET
    }
}

/// A decoded NIfTI object: the header plus its volume.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiObject {
    volume: Volume,
}

impl NiftiObject {
    /// Obtain a reference to the NIFTI header.
    pub fn header(&self) -> &NiftiHeader {
        self.volume.header()
    }

    /// Obtain a reference to the object's volume.
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Move the volume out of the object.
    pub fn into_volume(self) -> Volume {
        self.volume
    }
}

/// Decode a volume from a fully buffered payload with the default options.
/// See [`ReaderOptions::read_bytes`](struct.ReaderOptions.html#method.read_bytes).
pub fn decode_volume(bytes: &[u8], source: &str) -> Result<Volume> {
    ReaderOptions::new()
        .read_bytes(bytes, source)
        .map(NiftiObject::into_volume)
}

/// Decode a volume file with the default options.
/// See [`ReaderOptions::read_file`](struct.ReaderOptions.html#method.read_file).
pub fn load_volume<P: AsRef<Path>>(path: P) -> Result<Volume> {
    ReaderOptions::new()
        .read_file(path)
        .map(NiftiObject::into_volume)
}
