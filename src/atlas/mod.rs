//! Atlas region tables and the resolution of atlas voxels to region names.
//!
//! An atlas is a volume whose samples are region ids rather than signal
//! intensities, plus a table giving a name to each id. See [`Atlas`] for
//! the lookup itself.
//!
//! [`Atlas`]: struct.Atlas.html

pub mod labels;
pub mod lookup;
pub mod region;
pub mod resolver;

pub use self::labels::{
    find_bilingual, parse_label_list, read_bilingual_labels, LabelEntry, LabelMatch,
};
pub use self::lookup::{map_voxel, raw_id_from_value};
pub use self::region::{AtlasRegion, Hemisphere, RegionTable};
pub use self::resolver::{
    Atlas, AtlasConfig, HemisphereEncoding, Language, ResolvedRegion, AAL3_RESERVED_IDS,
    GLASSER_HEMISPHERE_OFFSET,
};
