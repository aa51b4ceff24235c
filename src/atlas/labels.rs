//! Plain-text atlas label lists and their bilingual label files.
//!
//! A label list has one `index name` pair per line, as shipped with
//! volumetric atlases (`1 Precentral_L 2001` and the like; columns after the
//! name are ignored). Blank lines and lines starting with `#` are skipped.
//! The bilingual label file is a JSON array of regions keyed by their
//! English label, which supplies the translated name, category and side.

use super::region::{AtlasRegion, Hemisphere, RegionTable};
use crate::error::{NiftiError, Result};
use log::trace;
use std::io::Read;

/// One line of a label list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    /// Value of the region's voxels in the atlas volume
    pub index: u32,
    /// Label of the region, usually with a side suffix
    pub name: String,
}

/// Parse a plain-text label list.
///
/// # Errors
///
/// - `NiftiError::InvalidLabelLine` with the 1-based line number if a line
///   does not start with a non-negative integer followed by a name.
pub fn parse_label_list(text: &str) -> Result<Vec<LabelEntry>> {
    let mut out = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let index = tokens.next().and_then(|t| t.parse::<u32>().ok());
        let name = tokens.next();
        match (index, name) {
            (Some(index), Some(name)) => out.push(LabelEntry {
                index,
                name: name.to_string(),
            }),
            _ => return Err(NiftiError::InvalidLabelLine(n + 1, line.to_string())),
        }
    }
    Ok(out)
}

/// Read a bilingual label file: a JSON array of regions, keyed by
/// `englishLabel`. Ids in this file are not used.
pub fn read_bilingual_labels<R: Read>(reader: R) -> Result<Vec<AtlasRegion>> {
    let labels = serde_json::from_reader(reader)?;
    Ok(labels)
}

/// How a label list entry was joined with a bilingual label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    /// Same English label
    Exact,
    /// The bilingual English label is a part of the entry's name
    Partial,
}

/// Find the bilingual label for an English name: the one with the very
/// same English label, else the one with the longest English label
/// contained in the name. Among equally long partial matches the first one
/// wins.
pub fn find_bilingual<'a>(
    name: &str,
    labels: &'a [AtlasRegion],
) -> Option<(&'a AtlasRegion, LabelMatch)> {
    if let Some(exact) = labels.iter().find(|l| l.english_label == name) {
        return Some((exact, LabelMatch::Exact));
    }
    let mut best: Option<&'a AtlasRegion> = None;
    for l in labels
        .iter()
        .filter(|l| !l.english_label.is_empty() && name.contains(l.english_label.as_str()))
    {
        if best.map_or(true, |b| l.english_label.len() > b.english_label.len()) {
            best = Some(l);
        }
    }
    best.map(|l| (l, LabelMatch::Partial))
}

impl RegionTable {
    /// Build a table from a plain-text label list, joining every entry with
    /// its bilingual label (see [`find_bilingual`]).
    ///
    /// The entry's own name stays the English label. A partial match only
    /// lends its translation and category: the side always comes from the
    /// entry's name in that case, since the matched label may belong to
    /// either hemisphere.
    pub fn from_label_list(text: &str, bilingual: &[AtlasRegion]) -> Result<RegionTable> {
        let entries = parse_label_list(text)?;
        let regions = entries.into_iter().map(|entry| {
            let mut region = match find_bilingual(&entry.name, bilingual) {
                Some((label, LabelMatch::Exact)) => {
                    let mut region = label.clone();
                    if !region.laterality.is_specified() {
                        region.laterality = Hemisphere::from_label(&entry.name);
                    }
                    region
                }
                Some((label, LabelMatch::Partial)) => {
                    trace!("label {} matched {} partially", entry.name, label.english_label);
                    AtlasRegion {
                        laterality: Hemisphere::from_label(&entry.name),
                        ..label.clone()
                    }
                }
                None => AtlasRegion {
                    laterality: Hemisphere::from_label(&entry.name),
                    ..AtlasRegion::new(entry.index, entry.name.as_str())
                },
            };
            region.id = entry.index;
            region.english_label = entry.name;
            region
        });
        Ok(RegionTable::from_regions(regions))
    }
}
