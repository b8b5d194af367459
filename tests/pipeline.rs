//! End-to-end flows: accident table -> WGS84 -> grid / statistics -> files.

use std::fs;

use geo::{Coord, MultiPolygon};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{PointZ, PolygonRing, PolygonZ, Writer};
use unfallkarte::data::{locations, to_wgs84, DatasetKind, DatasetLayout, RegionYearTable, SourceCrs, TypeYearTable};
use unfallkarte::io::csv::{read_accidents, read_delimited_str, write_csv};
use unfallkarte::io::geojson::{boundaries_to_geojson, choropleth_to_geojson, grid_to_geojson, write_json};
use unfallkarte::io::{read_accident_file, shp::read_boundaries, svg::write_grid_svg, write::write_atomic};
use unfallkarte::{aggregate, convert_3d_to_2d, MixedGeometryPolicy};

const BASEL_CSV: &str = "\
Unfalljahr;Beschreibung zum Unfalltyp;Unfallort Ost-Koordinaten;Unfallort Nord-Koordinaten
2011;Auffahrunfall;2611000;1267000
2011;Auffahrunfall;2611050;1267020
2012;Tierunfall;2614500;1269800
2013;Andere;2609200;1264100
2013;Andere;n/a;1264100
";

const SWISS_CSV: &str = "\
AccidentYear,RoadType_en,CantonCode,AccidentLocation_CHLV95_E,AccidentLocation_CHLV95_N
2012,Minor road,BS,2611000,1267000
2012,Principal road,BS,2611200,1267100
2012,Motorway,BE,2600500,1199500
2013,Minor road,BS,2611300,1267300
";

#[test]
fn basel_table_to_grid_geojson() {
    let df = read_delimited_str(BASEL_CSV, b';').unwrap();
    let (accidents, skipped) = read_accidents(&df, &DatasetLayout::new(DatasetKind::Basel)).unwrap();
    assert_eq!(skipped, 1);

    let (accidents, dropped) = to_wgs84(accidents, SourceCrs::Auto).unwrap();
    assert_eq!(dropped, 0);
    assert!(accidents.iter().all(|a| (7.5..7.7).contains(&a.location.x) && (47.5..47.6).contains(&a.location.y)));

    let grid = aggregate(&locations(&accidents), 75).unwrap();
    assert_eq!(grid.total(), 4);

    let value = grid_to_geojson(&grid);
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), grid.cells().len());
    let counted: u64 = features.iter().map(|f| f["properties"]["count"].as_u64().unwrap()).sum();
    assert_eq!(counted, 4);
}

#[test]
fn grid_files_are_written_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let df = read_delimited_str(BASEL_CSV, b';').unwrap();
    let (accidents, _) = read_accidents(&df, &DatasetLayout::new(DatasetKind::Basel)).unwrap();
    let (accidents, _) = to_wgs84(accidents, SourceCrs::Lv95).unwrap();
    let grid = aggregate(&locations(&accidents), 10).unwrap();

    let geojson = dir.path().join("grid.geojson");
    write_atomic(&geojson, false, |out| write_json(&grid_to_geojson(&grid), out)).unwrap();
    let text = fs::read_to_string(&geojson).unwrap();
    assert!(text.contains("FeatureCollection"));

    let svg = dir.path().join("grid.svg");
    write_atomic(&svg, false, |out| write_grid_svg(out, &grid, &[], 600.0, 8.0)).unwrap();
    assert!(fs::read_to_string(&svg).unwrap().contains("<svg"));

    // second write without force is refused and leaves the file intact
    assert!(write_atomic(&svg, false, |out| write_grid_svg(out, &grid, &[], 600.0, 8.0)).is_err());
}

#[test]
fn type_table_csv_is_zero_filled() {
    let df = read_delimited_str(BASEL_CSV, b';').unwrap();
    let (accidents, _) = read_accidents(&df, &DatasetLayout::new(DatasetKind::Basel)).unwrap();
    let table = TypeYearTable::from_accidents(&accidents, true);

    assert_eq!(table.years(), &[2011, 2012, 2013]);
    assert_eq!(table.types().len(), 3);
    assert_eq!(table.count(2011, "Accident with rear-end collision"), Some(2));
    assert_eq!(table.count(2012, "Other"), Some(0));

    let mut df = table.to_dataframe().unwrap();
    let mut out = Vec::new();
    write_csv(&mut df, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("year,type,count\n"));
    assert_eq!(text.lines().count(), 1 + 3 * 3);
}

/// Writes a two-region boundary layer with a `NAME` attribute.
fn write_regions(path: &std::path::Path) {
    let square = |x: f64, y: f64, size: f64| PolygonZ::new(PolygonRing::Outer(vec![
        PointZ::new(x, y, 250.0, 0.0),
        PointZ::new(x, y + size, 260.0, 0.0),
        PointZ::new(x + size, y + size, 270.0, 0.0),
        PointZ::new(x + size, y, 280.0, 0.0),
        PointZ::new(x, y, 250.0, 0.0),
    ]));

    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").unwrap(), 50);
    let mut writer = Writer::from_path(path, table).unwrap();
    for (name, shape) in [("Basel-Stadt", square(2_607_000.0, 1_263_000.0, 10_000.0)), ("Bern", square(2_590_000.0, 1_190_000.0, 20_000.0))] {
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
        writer.write_shape_and_record(&shape, &record).unwrap();
    }
}

#[test]
fn boundaries_convert_and_join_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cantons.shp");
    write_regions(&path);

    let boundaries = read_boundaries(&path, "NAME").unwrap();
    assert_eq!(boundaries.len(), 2);
    assert_eq!(boundaries[0].name, "Basel-Stadt");

    let geometries = boundaries.iter().map(|b| b.geometry.clone()).collect::<Vec<_>>();
    let shapes: Vec<MultiPolygon<f64>> = convert_3d_to_2d(&geometries, MixedGeometryPolicy::Reject).unwrap();
    let named = boundaries.iter().map(|b| b.name.as_str()).zip(shapes.iter()).collect::<Vec<_>>();

    let layer = boundaries_to_geojson(named.clone());
    assert_eq!(layer["features"][1]["properties"]["name"], "Bern");

    let df = read_delimited_str(SWISS_CSV, b',').unwrap();
    let layout = DatasetLayout::new(DatasetKind::Switzerland);
    let (accidents, _) = read_accidents(&df, &layout).unwrap();
    let table = RegionYearTable::from_accidents(&accidents, layout.region_codes);

    let value = choropleth_to_geojson(named, &table, 2012);
    let basel = &value["features"][0]["properties"];
    assert_eq!(basel["name"], "Basel-Stadt");
    assert_eq!(basel["Minor road"], 1);
    assert_eq!(basel["Motorway"], 0);
    assert_eq!(basel["Total"], 2);
    assert_eq!(value["features"][1]["properties"]["Total"], 1);
}

#[test]
fn accident_file_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accidents.csv");
    fs::write(&path, SWISS_CSV).unwrap();

    let accidents = read_accident_file(&path, &DatasetLayout::new(DatasetKind::Switzerland)).unwrap();
    assert_eq!(accidents.len(), 4);
    assert_eq!(accidents[0].location, Coord { x: 2_611_000.0, y: 1_267_000.0 });
    assert_eq!(accidents[2].region.as_deref(), Some("BE"));
}
