//! GeoJSON export for boundaries, grids and choropleth layers.

use std::io::Write;

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use crate::data::RegionYearTable;
use crate::geom::Grid;

fn ring_to_geojson(ring: &LineString<f64>) -> Value {
    json!(ring.coords().map(|c| [c.x, c.y]).collect::<Vec<_>>())
}

fn polygon_rings(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![ring_to_geojson(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_to_geojson));
    Value::Array(rings)
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": polygon_rings(polygon),
    })
}

pub fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": mp.0.iter().map(polygon_rings).collect::<Vec<_>>(),
    })
}

fn feature(geometry: Value, properties: Map<String, Value>) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Named shapes as a FeatureCollection with a `name` property.
pub fn boundaries_to_geojson<'a>(shapes: impl IntoIterator<Item = (&'a str, &'a MultiPolygon<f64>)>) -> Value {
    collection(shapes.into_iter()
        .map(|(name, shape)| {
            let mut properties = Map::new();
            properties.insert("name".into(), json!(name));
            feature(multipolygon_to_geojson(shape), properties)
        })
        .collect())
}

/// Every grid cell as a Polygon feature with `count`, `column` and `row`.
pub fn grid_to_geojson(grid: &Grid) -> Value {
    collection(grid.cells().iter()
        .map(|cell| {
            let mut properties = Map::new();
            properties.insert("count".into(), json!(cell.count()));
            properties.insert("column".into(), json!(cell.column()));
            properties.insert("row".into(), json!(cell.row()));
            feature(polygon_to_geojson(&cell.polygon()), properties)
        })
        .collect())
}

/// Regions joined by name to one year of a `RegionYearTable`. Each feature carries
/// `name`, `year`, one property per road type and `Total`; regions without data get zeros.
pub fn choropleth_to_geojson<'a>(
    regions: impl IntoIterator<Item = (&'a str, &'a MultiPolygon<f64>)>,
    table: &RegionYearTable,
    year: i32,
) -> Value {
    collection(regions.into_iter()
        .map(|(name, shape)| {
            let row = table.row(name, year);
            let mut properties = Map::new();
            properties.insert("name".into(), json!(name));
            properties.insert("year".into(), json!(year));
            for road_type in table.road_types() {
                properties.insert(road_type.clone(), json!(row.map_or(0, |r| r.count(road_type))));
            }
            properties.insert("Total".into(), json!(row.map_or(0, |r| r.total())));
            feature(multipolygon_to_geojson(shape), properties)
        })
        .collect())
}

/// Serialize a GeoJSON or table value.
pub fn write_json(value: &Value, writer: impl Write) -> Result<()> {
    serde_json::to_writer(writer, value)
        .context("[io::geojson] Failed to write JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon};

    fn square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 7.5, y: 47.5), (x: 7.6, y: 47.5), (x: 7.6, y: 47.6), (x: 7.5, y: 47.6), (x: 7.5, y: 47.5),
        ]])
    }

    #[test]
    fn multipolygon_nesting() {
        let value = multipolygon_to_geojson(&square());
        assert_eq!(value["type"], "MultiPolygon");
        // polygons -> rings -> positions -> [x, y]
        assert_eq!(value["coordinates"][0][0][0], json!([7.5, 47.5]));
        assert_eq!(value["coordinates"][0][0].as_array().unwrap().len(), 5);
        assert_eq!(value["coordinates"][0].as_array().unwrap().len(), 1);
    }

    #[test]
    fn holes_follow_exterior() {
        let polygon = Polygon::new(
            LineString::from(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 0.0 }, coord! { x: 4.0, y: 4.0 }]),
            vec![LineString::from(vec![coord! { x: 1.0, y: 1.0 }, coord! { x: 2.0, y: 1.0 }, coord! { x: 2.0, y: 2.0 }])],
        );
        let value = polygon_to_geojson(&polygon);
        assert_eq!(value["coordinates"].as_array().unwrap().len(), 2);
        assert_eq!(value["coordinates"][1][0], json!([1.0, 1.0]));
    }

    #[test]
    fn boundary_features_are_named() {
        let shape = square();
        let value = boundaries_to_geojson([("Basel-Stadt", &shape)]);
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["name"], "Basel-Stadt");
    }

    #[test]
    fn choropleth_without_data_is_zero() {
        let shape = square();
        let value = choropleth_to_geojson([("Riehen", &shape)], &RegionYearTable::default(), 2012);
        let properties = &value["features"][0]["properties"];
        assert_eq!(properties["Total"], 0);
        assert_eq!(properties["year"], 2012);
    }
}
