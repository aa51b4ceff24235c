//! An application for reading NIFTI-1 volume meta-data and value range.
//!
//! Pass a threshold after the file name to also report the size of the
//! iso-surface extracted at that value.

use nifti_atlas::{extract_isosurface, ReaderOptions};
use std::env;

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to NIFTI file is required");
    let threshold = args
        .next()
        .map(|t| t.parse::<f32>().expect("Threshold must be a number"));

    let obj = ReaderOptions::new()
        .sniff_gzip(true)
        .read_file(&filename)
        .expect("Failed to read NIFTI file");
    println!("{:#?}", obj.header());

    let volume = obj.volume();
    let unit = obj
        .header()
        .xyzt_to_space()
        .map(|u| u.symbol())
        .unwrap_or("");
    println!("dimensions: {:?}", volume.dim());
    println!("spacing: {:?} {}", volume.spacing(), unit);
    println!("affine ({:?}): {}", obj.header().affine_source(), volume.affine());
    match volume.value_range().bounds() {
        Some((min, max)) => println!("positive range: {} ..= {}", min, max),
        None => println!("positive range: empty"),
    }

    if let Some(threshold) = threshold {
        let mesh = extract_isosurface(volume, threshold);
        println!(
            "iso-surface at {}: {} vertices, {} triangles",
            threshold,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        if let Some((lo, hi)) = mesh.bounds() {
            println!("bounds: {:?} to {:?}", lo, hi);
        }
    }
}
