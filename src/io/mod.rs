//! IO module for format-specific reading and writing operations.
//!
//! Each format module handles reading and/or writing for a specific file format.
//!
//! # Format Modules
//!
//! - `csv` - delimited accident tables and statistics output
//! - `shp` - Shapefile boundary layers and accident point layers
//! - `geojson` - GeoJSON export of boundaries, grids and choropleth layers
//! - `svg` - SVG heatmap export
//! - `write` - write-then-rename for all file outputs

pub mod csv;
pub mod geojson;
pub mod shp;
pub mod svg;
pub mod write;

use std::path::Path;

use anyhow::Result;

use crate::data::{Accident, DatasetLayout};

/// Read accidents from a `.shp` point layer or a delimited table, by file extension.
/// Locations stay in the source CRS.
pub fn read_accident_file(path: &Path, layout: &DatasetLayout) -> Result<Vec<Accident>> {
    let is_shapefile = path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
    if is_shapefile {
        shp::read_accident_points(path, layout)
    } else {
        let df = csv::read_delimited(path, layout.delimiter)?;
        let (accidents, _skipped) = csv::read_accidents(&df, layout)?;
        Ok(accidents)
    }
}
