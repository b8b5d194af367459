//! Accident records and the dataset layouts they are read from.

mod names;
mod stats;

use geo::Coord;
use log::{info, warn};

use crate::geom::{Lv95ToWgs84, ProjectionError};

pub use names::{canton_name, municipality_name, translate_accident_type};
pub use stats::{RegionYearRow, RegionYearTable, TypeYearTable};

/// One accident after column mapping. `location` is in whatever CRS the source used
/// until it is reprojected.
#[derive(Debug, Clone, PartialEq)]
pub struct Accident {
    pub location: Coord<f64>,
    pub year: Option<i32>,
    pub kind: Option<String>,
    pub road_type: Option<String>,
    pub region: Option<String>,
}

impl Accident {
    pub fn at(location: Coord<f64>) -> Self {
        Self { location, year: None, kind: None, road_type: None, region: None }
    }
}

/// Known accident dataset layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// Canton Basel-Stadt open data export (`;`-separated, German headers).
    Basel,
    /// Federal road traffic accident locations (`,`-separated, English headers).
    Switzerland,
}

/// How region codes in a dataset translate to boundary names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCodes { Canton, Municipality }

impl RegionCodes {
    /// Translate a region code to the name used by the boundary layers.
    pub fn name(&self, code: &str) -> Option<&'static str> {
        match self {
            RegionCodes::Canton => canton_name(code),
            RegionCodes::Municipality => municipality_name(code),
        }
    }
}

/// Column mapping for a tabular accident dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub delimiter: u8,
    pub east: String,
    pub north: String,
    pub year: Option<String>,
    pub kind: Option<String>,
    pub road_type: Option<String>,
    pub region: Option<String>,
    pub region_codes: RegionCodes,
}

impl DatasetLayout {
    pub fn new(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Basel => Self {
                delimiter: b';',
                east: "Unfallort Ost-Koordinaten".into(),
                north: "Unfallort Nord-Koordinaten".into(),
                year: Some("Unfalljahr".into()),
                kind: Some("Beschreibung zum Unfalltyp".into()),
                road_type: None,
                region: None,
                region_codes: RegionCodes::Municipality,
            },
            DatasetKind::Switzerland => Self {
                delimiter: b',',
                east: "AccidentLocation_CHLV95_E".into(),
                north: "AccidentLocation_CHLV95_N".into(),
                year: Some("AccidentYear".into()),
                kind: None,
                road_type: Some("RoadType_en".into()),
                region: Some("CantonCode".into()),
                region_codes: RegionCodes::Canton,
            },
        }
    }

    /// Attribute names of the Basel accident point shapefile.
    pub fn basel_points() -> Self {
        Self {
            delimiter: b',',
            east: String::new(),
            north: String::new(),
            year: Some("accidentyea".into()),
            kind: None,
            road_type: Some("roadtype_en".into()),
            region: Some("municipalit".into()),
            region_codes: RegionCodes::Municipality,
        }
    }
}

/// Coordinate system of accident locations as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceCrs {
    /// LV95 if the first location lies in the LV95 extent, WGS84 otherwise.
    #[default]
    Auto,
    Lv95,
    Wgs84,
}

impl SourceCrs {
    pub fn resolve(self, accidents: &[Accident]) -> SourceCrs {
        match self {
            SourceCrs::Auto => match accidents.first() {
                Some(a) if Lv95ToWgs84::in_domain(a.location.x, a.location.y) => SourceCrs::Lv95,
                _ => SourceCrs::Wgs84,
            },
            crs => crs,
        }
    }
}

/// Bring accident locations to WGS84 `(x = lon, y = lat)`. Records whose location cannot
/// be transformed are dropped and counted.
pub fn to_wgs84(accidents: Vec<Accident>, crs: SourceCrs) -> Result<(Vec<Accident>, usize), ProjectionError> {
    match crs.resolve(&accidents) {
        SourceCrs::Lv95 => {
            let converter = Lv95ToWgs84::new()?;
            let total = accidents.len();
            let converted = accidents.into_iter()
                .filter_map(|accident| match converter.point(accident.location) {
                    Ok(location) => Some(Accident { location, ..accident }),
                    Err(e) => {
                        warn!("[data] dropping accident: {e}");
                        None
                    }
                })
                .collect::<Vec<_>>();
            let dropped = total - converted.len();
            info!("[data] reprojected {} accidents from EPSG:2056, dropped {dropped}", converted.len());
            Ok((converted, dropped))
        }
        _ => Ok((accidents, 0)),
    }
}

/// Locations of a set of accidents.
pub fn locations(accidents: &[Accident]) -> Vec<Coord<f64>> {
    accidents.iter().map(|accident| accident.location).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_detects_lv95() {
        let lv95 = [Accident::at(Coord { x: 2_611_000.0, y: 1_267_000.0 })];
        let wgs84 = [Accident::at(Coord { x: 7.58, y: 47.55 })];
        assert_eq!(SourceCrs::Auto.resolve(&lv95), SourceCrs::Lv95);
        assert_eq!(SourceCrs::Auto.resolve(&wgs84), SourceCrs::Wgs84);
        assert_eq!(SourceCrs::Lv95.resolve(&wgs84), SourceCrs::Lv95);
    }

    #[test]
    fn lv95_accidents_are_reprojected_and_bad_rows_dropped() {
        let accidents = vec![
            Accident { year: Some(2015), ..Accident::at(Coord { x: 2_611_000.0, y: 1_267_000.0 }) },
            Accident::at(Coord { x: 10.0, y: 10.0 }),
        ];
        let (converted, dropped) = to_wgs84(accidents, SourceCrs::Lv95).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].year, Some(2015));
        assert!((converted[0].location.x - 7.58477).abs() < 1e-4);
        assert!((converted[0].location.y - 47.55362).abs() < 1e-4);
    }

    #[test]
    fn wgs84_accidents_pass_through() {
        let accidents = vec![Accident::at(Coord { x: 7.58, y: 47.55 })];
        let (converted, dropped) = to_wgs84(accidents.clone(), SourceCrs::Auto).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(converted, accidents);
    }

    #[test]
    fn basel_layout_uses_german_headers() {
        let layout = DatasetLayout::new(DatasetKind::Basel);
        assert_eq!(layout.delimiter, b';');
        assert_eq!(layout.east, "Unfallort Ost-Koordinaten");
        assert_eq!(layout.region_codes, RegionCodes::Municipality);
    }

    #[test]
    fn swiss_layout_maps_cantons() {
        let layout = DatasetLayout::new(DatasetKind::Switzerland);
        assert_eq!(layout.region.as_deref(), Some("CantonCode"));
        assert_eq!(layout.region_codes.name("BS"), Some("Basel-Stadt"));
    }
}
