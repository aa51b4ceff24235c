//! An application for naming the atlas region under a position.
//!
//! ```text
//! atlas_lookup <atlas.nii[.gz]> <regions> <x> <y> <z> [--world] [--aal3] [--english]
//!              [--bilingual=<labels.json>]
//! ```
//!
//! The region file is an id-keyed JSON map, a JSON region list
//! (`{"regions": [...]}`), or a plain-text label list (`.txt`), which is
//! joined with the bilingual label file given by `--bilingual`.
//! Coordinates are voxel indices, or world coordinates with `--world`. The
//! atlas is taken as HCP-MMP1 (right hemisphere ids offset by 200) unless
//! `--aal3` is given.

use nifti_atlas::atlas::read_bilingual_labels;
use nifti_atlas::{load_volume, Atlas, AtlasConfig, Language, RegionTable};
use std::env;
use std::fs::File;

fn read_table(path: &str, bilingual: Option<&str>) -> RegionTable {
    let text = std::fs::read_to_string(path).expect("Failed to read region table");
    if path.ends_with(".txt") {
        let labels = match bilingual {
            Some(file) => read_bilingual_labels(File::open(file).expect("Failed to open labels"))
                .expect("Failed to read bilingual labels"),
            None => Vec::new(),
        };
        return RegionTable::from_label_list(&text, &labels).expect("Failed to read label list");
    }
    RegionTable::from_json_map(text.as_bytes())
        .or_else(|_| RegionTable::from_json_list(text.as_bytes()))
        .expect("Failed to read region table")
}

fn main() {
    env_logger::init();

    let (flags, args): (Vec<String>, Vec<String>) =
        env::args().skip(1).partition(|a| a.starts_with("--"));
    let has_flag = |name: &str| flags.iter().any(|f| f == name);
    if args.len() != 5 {
        eprintln!(
            "Usage: atlas_lookup <atlas> <regions> <x> <y> <z> \
             [--world] [--aal3] [--english] [--bilingual=<labels.json>]"
        );
        std::process::exit(2);
    }

    let volume = load_volume(&args[0]).expect("Failed to read atlas volume");
    let bilingual = flags
        .iter()
        .find_map(|f| f.strip_prefix("--bilingual="))
        .map(String::from);
    let table = read_table(&args[1], bilingual.as_deref());

    let mut config = if has_flag("--aal3") {
        AtlasConfig::aal3()
    } else {
        AtlasConfig::glasser()
    };
    if has_flag("--english") {
        config = config.with_language(Language::English);
    }
    let atlas = Atlas::new(config, table);

    let coords: Vec<f32> = args[2..]
        .iter()
        .map(|c| c.parse().expect("Coordinates must be numbers"))
        .collect();
    let resolved = if has_flag("--world") {
        atlas.resolve_at_world(&volume, [coords[0], coords[1], coords[2]])
    } else {
        let voxel = [coords[0] as usize, coords[1] as usize, coords[2] as usize];
        atlas.resolve_at_voxel(&volume, voxel)
    };

    println!("{} (id {}, {})", resolved, resolved.raw_id, atlas.config().name);
    if let Some(region) = &resolved.region {
        println!("{:#?}", region);
    }
    println!("{} regions listed", atlas.browsable_regions().len());
}
