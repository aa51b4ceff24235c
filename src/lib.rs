//! Decoding of NIfTI-1 brain volumes, region lookup in brain atlases, and
//! iso-surface extraction from scalar volumes.
//!
//! # Example
//!
//! Volumes are read through [`ReaderOptions`], or with the [`load_volume`]
//! shortcut. Files ending in `.gz` are inflated on the fly.
//!
//! ```no_run
//! use nifti_atlas::{extract_isosurface, ReaderOptions};
//! # use nifti_atlas::error::Result;
//!
//! # fn run() -> Result<()> {
//! let obj = ReaderOptions::new().read_file("brain.nii.gz")?;
//! let volume = obj.into_volume();
//! println!("{:?} voxels of {:?} mm", volume.dim(), volume.spacing());
//! if let Some((min, _max)) = volume.value_range().bounds() {
//!     let mesh = extract_isosurface(&volume, min);
//!     println!("{} triangles", mesh.triangle_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! An atlas is a volume of region ids. Together with a region table, it
//! names the region under any voxel:
//!
//! ```
//! use nifti_atlas::{Atlas, AtlasConfig, AtlasRegion, Hemisphere, RegionTable};
//!
//! let table = RegionTable::from_regions(vec![AtlasRegion::new(5, "Hippocampus")]);
//! let atlas = Atlas::new(AtlasConfig::glasser(), table);
//! assert_eq!(atlas.resolve(205).hemisphere, Hemisphere::Right);
//! assert_eq!(atlas.resolve(999).display_name, "Region 999");
//! ```
//!
//! [`ReaderOptions`]: object/struct.ReaderOptions.html
//! [`load_volume`]: object/fn.load_volume.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod affine;
pub mod atlas;
pub mod decompress;
pub mod error;
pub mod header;
pub mod mesh;
pub mod object;
pub mod stats;
pub mod typedef;
mod util;
pub mod volume;

pub use crate::atlas::{
    Atlas, AtlasConfig, AtlasRegion, Hemisphere, HemisphereEncoding, Language, RegionTable,
    ResolvedRegion,
};
pub use crate::error::{NiftiError, Result};
pub use crate::header::NiftiHeader;
pub use crate::mesh::{
    extract_isosurface, extract_isosurface_with, Interpolation, IsoSurfaceOptions, MeshGeometry,
};
pub use crate::object::{decode_volume, load_volume, NiftiObject, ReaderOptions};
pub use crate::stats::ValueRange;
pub use crate::typedef::{NiftiType, Unit, XForm};
pub use crate::util::Endianness;
#[cfg(feature = "ndarray_volumes")]
pub use crate::volume::ndarray::IntoNdArray;
pub use crate::volume::Volume;
