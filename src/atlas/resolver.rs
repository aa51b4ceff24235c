//! Region id to region name resolution.
//!
//! Atlases disagree on how they tell the hemispheres apart, so the way to
//! do it is an explicit, per-atlas [`HemisphereEncoding`]:
//!
//! - `IndexOffset`: right hemisphere regions carry the id of their left
//!   counterpart plus a fixed offset. The side is appended to the name.
//! - `EmbeddedLabel`: every region has its own id and the side is part of
//!   the label (`Precentral_L`) or of the label table. The side is put in
//!   front of the name.
//! - `Shared`: both hemispheres use the same ids, and only a position can
//!   tell them apart.

use super::lookup::raw_id_from_value;
use super::region::{AtlasRegion, Hemisphere, RegionTable};
use crate::error::Result;
use crate::volume::Volume;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;

/// Hemisphere offset of the HCP multi-modal parcellation.
pub const GLASSER_HEMISPHERE_OFFSET: u32 = 200;

/// Ids left empty in AAL3 (anterior cingulate and thalamus entries
/// superseded by finer subdivisions).
pub const AAL3_RESERVED_IDS: [u32; 4] = [35, 36, 81, 82];

/// How an atlas distinguishes left from right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HemisphereEncoding {
    /// Ids at or above `offset` are right hemisphere copies of `id - offset`.
    IndexOffset {
        /// Offset between a left region id and its right counterpart
        offset: u32,
    },
    /// Each side has its own id; the side is read from the region's
    /// laterality, else from its label.
    EmbeddedLabel,
    /// Both sides share ids; the side follows the sign of the world x
    /// coordinate, when resolving at a position.
    Shared,
}

/// Language of resolved display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Japanese labels and hemisphere markers
    Japanese,
    /// English labels and hemisphere markers
    English,
}

impl Default for Language {
    fn default() -> Self {
        Language::Japanese
    }
}

impl Language {
    fn suffix(self, side: Hemisphere) -> &'static str {
        match (self, side) {
            (Language::Japanese, Hemisphere::Left) => "（左）",
            (Language::Japanese, Hemisphere::Right) => "（右）",
            (Language::English, Hemisphere::Left) => " (left)",
            (Language::English, Hemisphere::Right) => " (right)",
            (_, Hemisphere::Unspecified) => "",
        }
    }

    fn prefix(self, side: Hemisphere) -> &'static str {
        match (self, side) {
            (Language::Japanese, Hemisphere::Left) => "左",
            (Language::Japanese, Hemisphere::Right) => "右",
            (Language::English, Hemisphere::Left) => "Left ",
            (Language::English, Hemisphere::Right) => "Right ",
            (_, Hemisphere::Unspecified) => "",
        }
    }
}

/// Configuration of an atlas, loadable from JSON.
///
/// ```
/// use nifti_atlas::atlas::{AtlasConfig, HemisphereEncoding};
///
/// let json = r#"{"name": "HCP-MMP1",
///                "encoding": {"kind": "index_offset", "offset": 200}}"#;
/// let config = AtlasConfig::from_json(json.as_bytes()).unwrap();
/// assert_eq!(config.encoding, HemisphereEncoding::IndexOffset { offset: 200 });
/// assert!(config.reserved_ids.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Display name of the atlas
    pub name: String,
    /// Hemisphere encoding strategy
    pub encoding: HemisphereEncoding,
    /// Ids that never label any voxel, hidden from region listings
    #[serde(default)]
    pub reserved_ids: BTreeSet<u32>,
    /// Language of display names
    #[serde(default)]
    pub language: Language,
}

impl AtlasConfig {
    /// The HCP multi-modal parcellation (Glasser et al.): 180 regions per
    /// hemisphere, right ids offset by 200.
    pub fn glasser() -> AtlasConfig {
        AtlasConfig {
            name: "HCP-MMP1".to_string(),
            encoding: HemisphereEncoding::IndexOffset {
                offset: GLASSER_HEMISPHERE_OFFSET,
            },
            reserved_ids: BTreeSet::new(),
            language: Language::default(),
        }
    }

    /// The automated anatomical labelling atlas, version 3: side embedded
    /// in the labels, four reserved ids.
    pub fn aal3() -> AtlasConfig {
        AtlasConfig {
            name: "AAL3".to_string(),
            encoding: HemisphereEncoding::EmbeddedLabel,
            reserved_ids: AAL3_RESERVED_IDS.iter().cloned().collect(),
            language: Language::default(),
        }
    }

    /// Read a configuration from JSON.
    pub fn from_json<R: Read>(reader: R) -> Result<AtlasConfig> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Same configuration with another display language.
    pub fn with_language(mut self, language: Language) -> AtlasConfig {
        self.language = language;
        self
    }
}

/// The outcome of resolving a region id. Never an error: ids with no
/// region (background, boundaries, reserved ids missing from the table)
/// give a placeholder name and no region.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRegion {
    /// Id as read from the atlas
    pub raw_id: i64,
    /// Id in the atlas's base numbering, the table key
    pub base_id: i64,
    /// Side of the brain, if known
    pub hemisphere: Hemisphere,
    /// Region metadata, `None` on a lookup miss
    pub region: Option<AtlasRegion>,
    /// Name to show to the user
    pub display_name: String,
}

impl ResolvedRegion {
    fn miss(raw_id: i64, base_id: i64) -> ResolvedRegion {
        trace!("no region for id {}", raw_id);
        ResolvedRegion {
            raw_id,
            base_id,
            hemisphere: Hemisphere::Unspecified,
            region: None,
            display_name: format!("Region {}", raw_id),
        }
    }

    /// Whether the id matched a region of the table.
    pub fn is_known(&self) -> bool {
        self.region.is_some()
    }
}

impl fmt::Display for ResolvedRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// An atlas: its configuration plus its region table.
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    config: AtlasConfig,
    table: RegionTable,
}

impl Atlas {
    /// Pair a configuration with its region table.
    pub fn new(config: AtlasConfig, table: RegionTable) -> Atlas {
        Atlas { config, table }
    }

    /// The atlas configuration.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// The region table.
    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    /// Resolve a raw region id, as stored in the atlas volume.
    ///
    /// Any integer is accepted, and the same id always resolves the same
    /// way. With a `Shared` encoding the side is left unspecified; see
    /// [`resolve_at_world`](#method.resolve_at_world).
    ///
    /// # Example
    ///
    /// ```
    /// use nifti_atlas::atlas::{Atlas, AtlasConfig, Hemisphere, RegionTable};
    ///
    /// let json = r#"{"5": {"englishLabel": "Hippocampus", "laterality": ""}}"#;
    /// let table = RegionTable::from_json_map(json.as_bytes()).unwrap();
    /// let atlas = Atlas::new(AtlasConfig::glasser(), table);
    ///
    /// assert_eq!(atlas.resolve(5).hemisphere, Hemisphere::Left);
    /// assert_eq!(atlas.resolve(205).display_name, "Hippocampus（右）");
    /// assert_eq!(atlas.resolve(999).display_name, "Region 999");
    /// ```
    pub fn resolve(&self, raw_id: i64) -> ResolvedRegion {
        self.resolve_with_side(raw_id, Hemisphere::Unspecified)
    }

    /// Resolve the region id stored in an atlas sample.
    pub fn resolve_value(&self, value: f32) -> ResolvedRegion {
        self.resolve(raw_id_from_value(value))
    }

    /// Resolve the region at a voxel of the atlas volume. Voxels outside the
    /// volume resolve as background (id 0).
    pub fn resolve_at_voxel(&self, atlas: &Volume, voxel: [usize; 3]) -> ResolvedRegion {
        let raw_id = atlas.get(voxel).map(raw_id_from_value).unwrap_or(0);
        let side = match self.config.encoding {
            HemisphereEncoding::Shared if atlas.index_of(voxel).is_some() => {
                side_of_world_x(atlas.world_at_voxel(voxel)[0])
            }
            _ => Hemisphere::Unspecified,
        };
        self.resolve_with_side(raw_id, side)
    }

    /// Resolve the region at a world (scanner or template) position, using
    /// the atlas volume's affine transform. Positions outside the volume
    /// resolve as background (id 0).
    pub fn resolve_at_world(&self, atlas: &Volume, world: [f32; 3]) -> ResolvedRegion {
        let raw_id = atlas
            .voxel_at_world(world)
            .and_then(|v| atlas.get(v))
            .map(raw_id_from_value)
            .unwrap_or(0);
        self.resolve_with_side(raw_id, side_of_world_x(world[0]))
    }

    /// Regions meant to be listed or browsed: every region of the table
    /// except the reserved ids, in ascending id order.
    pub fn browsable_regions(&self) -> Vec<&AtlasRegion> {
        self.table
            .iter()
            .filter(|r| !self.config.reserved_ids.contains(&r.id))
            .collect()
    }

    /// Display name of a region of this atlas, without hemisphere marker.
    pub fn label_of<'a>(&self, region: &'a AtlasRegion) -> &'a str {
        match self.config.language {
            Language::Japanese => region
                .japanese_label
                .as_ref()
                .map(String::as_str)
                .filter(|l| !l.is_empty())
                .unwrap_or(region.english_label.as_str()),
            Language::English => region.english_label.as_str(),
        }
    }

    /// `position_side` is only used by the `Shared` encoding.
    fn resolve_with_side(&self, raw_id: i64, position_side: Hemisphere) -> ResolvedRegion {
        let language = self.config.language;
        match self.config.encoding {
            HemisphereEncoding::IndexOffset { offset } => {
                let offset = i64::from(offset);
                let (side, base_id) = if offset > 0 && raw_id >= offset {
                    (Hemisphere::Right, raw_id - offset)
                } else {
                    (Hemisphere::Left, raw_id)
                };
                match self.lookup(base_id) {
                    Some(region) => {
                        let display_name =
                            format!("{}{}", self.label_of(region), language.suffix(side));
                        self.hit(raw_id, base_id, side, region, display_name)
                    }
                    None => ResolvedRegion::miss(raw_id, base_id),
                }
            }
            HemisphereEncoding::EmbeddedLabel => match self.lookup(raw_id) {
                Some(region) => {
                    let side = if region.laterality.is_specified() {
                        region.laterality
                    } else {
                        Hemisphere::from_label(&region.english_label)
                    };
                    let label = match language {
                        Language::English if side.is_specified() => {
                            strip_side_token(&region.english_label)
                        }
                        _ => self.label_of(region),
                    };
                    let display_name = format!("{}{}", language.prefix(side), label);
                    self.hit(raw_id, raw_id, side, region, display_name)
                }
                None => ResolvedRegion::miss(raw_id, raw_id),
            },
            HemisphereEncoding::Shared => match self.lookup(raw_id) {
                Some(region) => {
                    let display_name = format!(
                        "{}{}",
                        self.label_of(region),
                        language.suffix(position_side)
                    );
                    self.hit(raw_id, raw_id, position_side, region, display_name)
                }
                None => ResolvedRegion::miss(raw_id, raw_id),
            },
        }
    }

    fn lookup(&self, base_id: i64) -> Option<&AtlasRegion> {
        if base_id < 0 || base_id > i64::from(u32::max_value()) {
            return None;
        }
        self.table.get(base_id as u32)
    }

    fn hit(
        &self,
        raw_id: i64,
        base_id: i64,
        hemisphere: Hemisphere,
        region: &AtlasRegion,
        display_name: String,
    ) -> ResolvedRegion {
        ResolvedRegion {
            raw_id,
            base_id,
            hemisphere,
            region: Some(region.clone()),
            display_name,
        }
    }
}

/// World x below zero is the left hemisphere (RAS+ convention).
fn side_of_world_x(x: f32) -> Hemisphere {
    if !x.is_finite() {
        Hemisphere::Unspecified
    } else if x < 0. {
        Hemisphere::Left
    } else {
        Hemisphere::Right
    }
}

/// `Precentral_L` becomes `Precentral`; labels without a side token are
/// returned as they are.
fn strip_side_token(label: &str) -> &str {
    match label.rfind('_') {
        Some(i) if matches!(&label[i + 1..], "L" | "R") => &label[..i],
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glasser_table() -> RegionTable {
        RegionTable::from_regions(vec![
            AtlasRegion {
                japanese_label: Some("一次視覚野".to_string()),
                ..AtlasRegion::new(1, "V1")
            },
            AtlasRegion::new(5, "Hippocampus"),
        ])
    }

    #[test]
    fn index_offset_sides() {
        let atlas = Atlas::new(AtlasConfig::glasser(), glasser_table());
        let left = atlas.resolve(1);
        let right = atlas.resolve(201);
        assert_eq!(left.hemisphere, Hemisphere::Left);
        assert_eq!(right.hemisphere, Hemisphere::Right);
        assert_eq!(left.region, right.region);
        assert_eq!(right.base_id, 1);
        assert_eq!(left.display_name, "一次視覚野（左）");
        assert_eq!(right.display_name, "一次視覚野（右）");

        let atlas = Atlas::new(
            AtlasConfig::glasser().with_language(Language::English),
            glasser_table(),
        );
        assert_eq!(atlas.resolve(201).display_name, "V1 (right)");
        assert_eq!(atlas.resolve(5).display_name, "Hippocampus (left)");
    }

    #[test]
    fn misses_are_placeholders() {
        let atlas = Atlas::new(AtlasConfig::glasser(), glasser_table());
        for id in &[0i64, -1, -201, 199, 200, 400, 999, i64::max_value(), i64::min_value()] {
            let r = atlas.resolve(*id);
            assert!(!r.is_known());
            assert_eq!(r.display_name, format!("Region {}", id));
            assert_eq!(r.hemisphere, Hemisphere::Unspecified);
        }
    }

    #[test]
    fn embedded_label_sides() {
        let mut insula = AtlasRegion::new(33, "Insula_L");
        insula.japanese_label = Some("島".to_string());
        let mut vermis = AtlasRegion::new(150, "Vermis_1_2");
        vermis.japanese_label = Some("虫部".to_string());
        let mut thal = AtlasRegion::new(122, "Thal_AV_R");
        thal.laterality = Hemisphere::Right;
        thal.japanese_label = Some("視床前腹側核".to_string());
        let table = RegionTable::from_regions(vec![insula, vermis, thal]);

        let atlas = Atlas::new(AtlasConfig::aal3(), table.clone());
        let r = atlas.resolve(33);
        assert_eq!(r.hemisphere, Hemisphere::Left);
        assert_eq!(r.display_name, "左島");
        assert_eq!(atlas.resolve(122).display_name, "右視床前腹側核");
        let r = atlas.resolve(150);
        assert_eq!(r.hemisphere, Hemisphere::Unspecified);
        assert_eq!(r.display_name, "虫部");

        let atlas = Atlas::new(AtlasConfig::aal3().with_language(Language::English), table);
        assert_eq!(atlas.resolve(33).display_name, "Left Insula");
        assert_eq!(atlas.resolve(122).display_name, "Right Thal_AV");
        assert_eq!(atlas.resolve(150).display_name, "Vermis_1_2");
        assert_eq!(atlas.resolve(233).display_name, "Region 233");
    }

    #[test]
    fn reserved_ids_are_hidden_but_resolvable() {
        let table = RegionTable::from_regions(
            (30..=40).map(|id| AtlasRegion::new(id, format!("R{}_L", id))),
        );
        let atlas = Atlas::new(AtlasConfig::aal3(), table);
        let listed: Vec<u32> = atlas.browsable_regions().iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![30, 31, 32, 33, 34, 37, 38, 39, 40]);
        assert!(atlas.resolve(35).is_known());
    }

    #[test]
    fn shared_uses_position() {
        let config = AtlasConfig {
            name: "Shared".to_string(),
            encoding: HemisphereEncoding::Shared,
            reserved_ids: BTreeSet::new(),
            language: Language::English,
        };
        let atlas = Atlas::new(config, glasser_table());
        assert_eq!(atlas.resolve(1).display_name, "V1");
        assert_eq!(atlas.resolve(1).hemisphere, Hemisphere::Unspecified);
        assert_eq!(
            atlas.resolve_with_side(1, side_of_world_x(-10.)).display_name,
            "V1 (left)"
        );
        assert_eq!(
            atlas.resolve_with_side(1, side_of_world_x(0.)).display_name,
            "V1 (right)"
        );
    }

    #[test]
    fn side_token_stripping() {
        assert_eq!(strip_side_token("Precentral_L"), "Precentral");
        assert_eq!(strip_side_token("Frontal_Sup_2_R"), "Frontal_Sup_2");
        assert_eq!(strip_side_token("Vermis_10"), "Vermis_10");
        assert_eq!(strip_side_token("V1"), "V1");
    }

    #[test]
    fn config_json_round_trip() {
        let config = AtlasConfig::aal3().with_language(Language::English);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""kind":"embedded_label""#));
        assert!(json.contains(r#""language":"english""#));
        let back = AtlasConfig::from_json(json.as_bytes()).unwrap();
        assert_eq!(back, config);
    }
}
