mod algorithm;
mod bbox;
mod geom;

pub(crate) use bbox::BoundingBox;
pub use algorithm::grid::{aggregate, aggregate_within, bounds_of, Grid, GridCell, GridError, MAX_CELLS};
pub use algorithm::proj::{convert_3d_to_2d, convert_boundaries, convert_each, Lv95ToWgs84, MixedGeometryPolicy, ProjectionError, LV95_EASTING, LV95_NORTHING};
pub use geom::{filter_by_name, Boundary, Coord3, Geometry3, GeometryKind, Polygon3};
