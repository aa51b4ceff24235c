//! Atlas region metadata and region tables.

use crate::error::Result;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Side of the brain a region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hemisphere {
    /// Left hemisphere
    Left,
    /// Right hemisphere
    Right,
    /// Midline structure, or side not known
    Unspecified,
}

impl Default for Hemisphere {
    fn default() -> Self {
        Hemisphere::Unspecified
    }
}

impl Hemisphere {
    /// Parse a laterality field. Accepts the empty string, `left`/`right`
    /// (any case), `L`/`R` and `左`/`右`.
    pub fn parse(text: &str) -> Option<Hemisphere> {
        match text.trim() {
            "" => Some(Hemisphere::Unspecified),
            "左" => Some(Hemisphere::Left),
            "右" => Some(Hemisphere::Right),
            t if t.eq_ignore_ascii_case("left") || t.eq_ignore_ascii_case("l") => {
                Some(Hemisphere::Left)
            }
            t if t.eq_ignore_ascii_case("right") || t.eq_ignore_ascii_case("r") => {
                Some(Hemisphere::Right)
            }
            _ => None,
        }
    }

    /// Side encoded in a label such as `Precentral_L` by its last
    /// underscore-separated token.
    pub fn from_label(label: &str) -> Hemisphere {
        match label.rfind('_').map(|i| &label[i + 1..]) {
            Some("L") => Hemisphere::Left,
            Some("R") => Hemisphere::Right,
            _ => Hemisphere::Unspecified,
        }
    }

    /// Lower case name, empty for `Unspecified`.
    pub fn as_str(self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
            Hemisphere::Unspecified => "",
        }
    }

    /// Whether the side is known.
    pub fn is_specified(self) -> bool {
        self != Hemisphere::Unspecified
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Hemisphere {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Hemisphere {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        let text = text.unwrap_or_default();
        Hemisphere::parse(&text)
            .ok_or_else(|| de::Error::custom(format!("unknown laterality {:?}", text)))
    }
}

/// A single anatomical label of an atlas.
///
/// Field names follow the JSON label files (`englishLabel`,
/// `japaneseLabel`, ...). The cortical atlas files only carry `name`,
/// which is accepted in place of `englishLabel`. `network` may be a single
/// grouping or a list of them, in which case the first one is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasRegion {
    /// Region id in the atlas's base (left hemisphere) numbering
    #[serde(default)]
    pub id: u32,
    /// Label in English, or the atlas's own label
    #[serde(alias = "name")]
    pub english_label: String,
    /// Readable English name, such as `Precentral gyrus` for `Precentral_L`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    /// Label in Japanese
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese_label: Option<String>,
    /// Side of the brain, when the label table states it
    #[serde(default)]
    pub laterality: Hemisphere,
    /// Anatomical category (lobe, nucleus, ...)
    #[serde(default)]
    pub category: String,
    /// Functional network grouping
    #[serde(
        default,
        deserialize_with = "first_network",
        skip_serializing_if = "Option::is_none"
    )]
    pub network: Option<String>,
    /// Free text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AtlasRegion {
    /// A region with only an id and an English label.
    pub fn new<S: Into<String>>(id: u32, english_label: S) -> AtlasRegion {
        AtlasRegion {
            id,
            english_label: english_label.into(),
            english_name: None,
            japanese_label: None,
            laterality: Hemisphere::Unspecified,
            category: String::new(),
            network: None,
            description: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn first_network<'de, D>(deserializer: D) -> ::std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let network: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(network.and_then(|n| match n {
        OneOrMany::One(n) => Some(n),
        OneOrMany::Many(list) => list.into_iter().next(),
    }))
}

#[derive(Deserialize)]
struct RegionList {
    regions: Vec<AtlasRegion>,
}

/// Read-only mapping from region id to region metadata, built once when
/// the atlas is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTable {
    regions: BTreeMap<u32, AtlasRegion>,
}

impl RegionTable {
    /// An empty table.
    pub fn new() -> RegionTable {
        RegionTable::default()
    }

    /// Build a table from regions, keyed by their `id`.
    /// A later region replaces an earlier one with the same id.
    pub fn from_regions<I>(regions: I) -> RegionTable
    where
        I: IntoIterator<Item = AtlasRegion>,
    {
        RegionTable {
            regions: regions.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Read an id-keyed JSON object, such as `{"5": {"englishLabel": ...}}`.
    /// The key is authoritative: each region's `id` is set from it.
    pub fn from_json_map<R: Read>(reader: R) -> Result<RegionTable> {
        let map: BTreeMap<u32, AtlasRegion> = serde_json::from_reader(reader)?;
        Ok(RegionTable {
            regions: map
                .into_iter()
                .map(|(id, mut region)| {
                    region.id = id;
                    (id, region)
                })
                .collect(),
        })
    }

    /// Read a JSON region list, such as `{"regions": [{"id": 1, ...}]}`.
    pub fn from_json_list<R: Read>(reader: R) -> Result<RegionTable> {
        let list: RegionList = serde_json::from_reader(reader)?;
        Ok(RegionTable::from_regions(list.regions))
    }

    /// Look up a region by id.
    pub fn get(&self, id: u32) -> Option<&AtlasRegion> {
        self.regions.get(&id)
    }

    /// Whether the table has a region with this id.
    pub fn contains(&self, id: u32) -> bool {
        self.regions.contains_key(&id)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table holds no region at all.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All regions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AtlasRegion> {
        self.regions.values()
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a AtlasRegion;
    type IntoIter = std::collections::btree_map::Values<'a, u32, AtlasRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laterality_values() {
        assert_eq!(Hemisphere::parse(""), Some(Hemisphere::Unspecified));
        assert_eq!(Hemisphere::parse("left"), Some(Hemisphere::Left));
        assert_eq!(Hemisphere::parse("Right"), Some(Hemisphere::Right));
        assert_eq!(Hemisphere::parse("左"), Some(Hemisphere::Left));
        assert_eq!(Hemisphere::parse("右"), Some(Hemisphere::Right));
        assert_eq!(Hemisphere::parse("R"), Some(Hemisphere::Right));
        assert_eq!(Hemisphere::parse("both"), None);
    }

    #[test]
    fn side_from_label() {
        assert_eq!(Hemisphere::from_label("Precentral_L"), Hemisphere::Left);
        assert_eq!(Hemisphere::from_label("Frontal_Sup_2_R"), Hemisphere::Right);
        assert_eq!(Hemisphere::from_label("Vermis_1_2"), Hemisphere::Unspecified);
        assert_eq!(Hemisphere::from_label("L"), Hemisphere::Unspecified);
        assert_eq!(Hemisphere::from_label("Thal_LGN_"), Hemisphere::Unspecified);
    }

    #[test]
    fn region_from_json() {
        let json = r#"{"englishLabel": "Hippocampus_L", "japaneseLabel": "海馬",
                       "laterality": "左", "category": "大脳辺縁系"}"#;
        let region: AtlasRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.id, 0);
        assert_eq!(region.english_label, "Hippocampus_L");
        assert_eq!(region.japanese_label.as_deref(), Some("海馬"));
        assert_eq!(region.laterality, Hemisphere::Left);
        assert_eq!(region.network, None);

        let json = r#"{"id": 1, "name": "V1", "description": "Primary Visual Cortex",
                       "network": "Visual"}"#;
        let region: AtlasRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.english_label, "V1");
        assert_eq!(region.laterality, Hemisphere::Unspecified);
        assert_eq!(region.network.as_deref(), Some("Visual"));

        let json = r#"{"englishLabel": "X", "laterality": "up"}"#;
        assert!(serde_json::from_str::<AtlasRegion>(json).is_err());

        let json = r#"{"englishLabel": "X", "network": 3}"#;
        assert!(serde_json::from_str::<AtlasRegion>(json).is_err());
    }

    #[test]
    fn network_list_keeps_first() {
        let json = r#"{"englishLabel": "Precentral_L", "network": ["Motor", "Sensorimotor"]}"#;
        let region: AtlasRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.network.as_deref(), Some("Motor"));

        let json = r#"{"englishLabel": "Precentral_L", "network": []}"#;
        let region: AtlasRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.network, None);

        let json = r#"{"englishLabel": "Precentral_L", "network": null}"#;
        let region: AtlasRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.network, None);
    }

    #[test]
    fn laterality_serializes_as_text() {
        let mut region = AtlasRegion::new(3, "Insula_R");
        region.laterality = Hemisphere::Right;
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["laterality"], "right");
        assert_eq!(json["englishLabel"], "Insula_R");
        assert!(json.get("japaneseLabel").is_none());
    }

    #[test]
    fn table_keys_set_ids() {
        let json = r#"{"5": {"englishLabel": "Hippocampus", "laterality": ""},
                       "12": {"englishLabel": "Amygdala"}}"#;
        let table = RegionTable::from_json_map(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(5).map(|r| r.id), Some(5));
        assert_eq!(table.get(12).map(|r| r.english_label.as_str()), Some("Amygdala"));
        assert!(table.get(6).is_none());
        let ids: Vec<u32> = table.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 12]);
    }

    #[test]
    fn table_rejects_bad_keys() {
        let json = r#"{"five": {"englishLabel": "Hippocampus"}}"#;
        assert!(RegionTable::from_json_map(json.as_bytes()).is_err());
    }
}
