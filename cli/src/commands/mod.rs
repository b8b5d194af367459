pub mod boundary;
pub mod choropleth;
pub mod grid;
pub mod types;

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::MultiPolygon;
use log::{info, warn};
use unfallkarte::{
    data::{to_wgs84, Accident, DatasetKind, DatasetLayout, SourceCrs},
    geom::{self, filter_by_name, Boundary}, io::{read_accident_file, shp::read_boundaries},
    MixedGeometryPolicy,
};

use crate::cli::{Crs, Dataset, LayoutArgs, Policy};

impl From<Policy> for MixedGeometryPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Skip => MixedGeometryPolicy::Skip,
            Policy::Reject => MixedGeometryPolicy::Reject,
        }
    }
}

impl From<Dataset> for DatasetKind {
    fn from(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Basel => DatasetKind::Basel,
            Dataset::Switzerland => DatasetKind::Switzerland,
        }
    }
}

impl From<Crs> for SourceCrs {
    fn from(crs: Crs) -> Self {
        match crs {
            Crs::Auto => SourceCrs::Auto,
            Crs::Lv95 => SourceCrs::Lv95,
            Crs::Wgs84 => SourceCrs::Wgs84,
        }
    }
}

fn is_shapefile(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("shp"))
}

/// Column mapping for `path`: point shapefiles use the Basel point attributes,
/// tables use the selected dataset. Explicit column flags override either.
pub fn layout_for(path: &Path, args: &LayoutArgs) -> Result<DatasetLayout> {
    let mut layout = if is_shapefile(path) {
        DatasetLayout::basel_points()
    } else {
        DatasetLayout::new(args.dataset.into())
    };

    if let Some(delimiter) = args.delimiter {
        if !delimiter.is_ascii() { bail!("Delimiter must be a single ASCII character, got {delimiter:?}") }
        layout.delimiter = delimiter as u8;
    }
    if let Some(name) = &args.east_column { layout.east = name.clone() }
    if let Some(name) = &args.north_column { layout.north = name.clone() }
    if let Some(name) = &args.year_column { layout.year = Some(name.clone()) }
    if let Some(name) = &args.type_column { layout.kind = Some(name.clone()) }
    if let Some(name) = &args.road_type_column { layout.road_type = Some(name.clone()) }
    if let Some(name) = &args.region_column { layout.region = Some(name.clone()) }

    Ok(layout)
}

/// Read accidents and bring their locations to WGS84.
pub fn load_accidents(path: &Path, layout: &DatasetLayout, crs: Crs) -> Result<Vec<Accident>> {
    let accidents = read_accident_file(path, layout)?;
    info!("[accidents] read {} records from {}", accidents.len(), path.display());

    let (accidents, dropped) = to_wgs84(accidents, crs.into())
        .with_context(|| format!("[accidents] Failed to reproject {}", path.display()))?;
    if dropped > 0 { warn!("[accidents] {dropped} records outside the LV95 extent were dropped") }
    Ok(accidents)
}

/// Read boundaries, optionally filtered by name.
pub fn load_boundaries(path: &Path, name_field: &str, filter: Option<&str>) -> Result<Vec<Boundary>> {
    let boundaries = read_boundaries(path, name_field)?;
    let boundaries = match filter {
        Some(needle) => filter_by_name(boundaries, needle),
        None => boundaries,
    };
    if boundaries.is_empty() {
        bail!("No boundaries in {} match {:?}", path.display(), filter.unwrap_or_default());
    }
    Ok(boundaries)
}

/// Convert boundaries to WGS84, keeping names. See `unfallkarte::geom::convert_boundaries`.
pub fn convert_boundaries(boundaries: &[Boundary], policy: MixedGeometryPolicy) -> Result<Vec<(String, MultiPolygon<f64>)>> {
    geom::convert_boundaries(boundaries, policy)
        .context("[boundary] Failed to convert boundaries from LV95 to WGS84")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use unfallkarte::geom::{Coord3, Geometry3, Polygon3};

    fn riehen() -> Polygon3 {
        Polygon3::new(vec![
            Coord3::new(2_615_000.0, 1_268_000.0, 280.0),
            Coord3::new(2_618_000.0, 1_268_000.0, 300.0),
            Coord3::new(2_618_000.0, 1_271_000.0, 320.0),
        ], vec![])
    }

    fn boundaries() -> Vec<Boundary> {
        vec![
            Boundary { name: "Riehen".into(), geometry: Geometry3::Polygon(riehen()) },
            Boundary { name: "Basel".into(), geometry: Geometry3::MultiPolygon(vec![riehen(), riehen()]) },
        ]
    }

    #[test]
    fn reject_policy_fails_on_multipart_boundary() {
        let err = convert_boundaries(&boundaries(), Policy::Reject.into()).unwrap_err();
        assert!(format!("{err:#}").contains("MultiPolygon"), "{err:#}");
    }

    #[test]
    fn skip_policy_keeps_polygons() {
        let converted = convert_boundaries(&boundaries(), Policy::Skip.into()).unwrap();
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].0, "Riehen");
    }

    fn layout_args(dataset: Dataset) -> LayoutArgs {
        LayoutArgs {
            dataset,
            crs: Crs::Auto,
            delimiter: None,
            east_column: None,
            north_column: None,
            year_column: None,
            type_column: None,
            road_type_column: None,
            region_column: None,
        }
    }

    #[test]
    fn column_flags_override_dataset_layout() {
        let mut args = layout_args(Dataset::Switzerland);
        args.delimiter = Some(';');
        args.year_column = Some("Jahr".into());
        let layout = layout_for(&PathBuf::from("accidents.csv"), &args).unwrap();
        assert_eq!(layout.delimiter, b';');
        assert_eq!(layout.year.as_deref(), Some("Jahr"));
        assert_eq!(layout.region.as_deref(), Some("CantonCode"));
    }

    #[test]
    fn point_shapefiles_use_point_attributes() {
        let layout = layout_for(&PathBuf::from("100120.SHP"), &layout_args(Dataset::Basel)).unwrap();
        assert_eq!(layout.year.as_deref(), Some("accidentyea"));
    }

    #[test]
    fn non_ascii_delimiter_is_refused() {
        let mut args = layout_args(Dataset::Basel);
        args.delimiter = Some('§');
        assert!(layout_for(&PathBuf::from("accidents.csv"), &args).is_err());
    }
}
