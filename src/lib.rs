#![doc = "Unfallkarte: reprojection and spatial aggregation of Swiss traffic-accident data"]
pub mod data;
pub mod geom;
pub mod io;

#[doc(inline)]
pub use geom::{
    aggregate, aggregate_within, convert_3d_to_2d, convert_each, Grid, GridCell, GridError,
    Lv95ToWgs84, MixedGeometryPolicy, ProjectionError,
};

#[doc(inline)]
pub use data::{Accident, DatasetKind, DatasetLayout, SourceCrs};
