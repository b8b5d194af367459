use anyhow::{bail, Context, Result};
use geo::{BoundingRect, MultiPolygon};
use log::{info, warn};
use unfallkarte::{
    aggregate, aggregate_within, data::locations,
    io::{geojson::{grid_to_geojson, write_json}, svg::write_grid_svg, write::write_atomic},
    MixedGeometryPolicy,
};

use super::{convert_boundaries, layout_for, load_accidents, load_boundaries};
use crate::cli::GridFormat;

const SVG_MARGIN: f64 = 8.0;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::GridArgs) -> Result<()> {
    let layout = layout_for(&args.accidents, &args.layout)?;
    let accidents = load_accidents(&args.accidents, &layout, args.layout.crs)?;
    let points = locations(&accidents);

    let outlines = match &args.boundary {
        Some(path) => {
            let boundaries = load_boundaries(path, &args.name_field, args.filter.as_deref())?;
            convert_boundaries(&boundaries, MixedGeometryPolicy::Skip)?
                .into_iter().map(|(_, shape)| shape).collect::<Vec<_>>()
        }
        None => Vec::new(),
    };

    let result = if outlines.is_empty() {
        aggregate(&points, args.cells)
    } else {
        let union = MultiPolygon(outlines.iter().flat_map(|shape| shape.0.iter().cloned()).collect());
        let Some(bounds) = union.bounding_rect() else { bail!("[grid] boundary has no extent") };
        aggregate_within(&points, bounds, args.cells)
    };
    let grid = result.context("[grid] Failed to aggregate accidents")?;

    info!("[grid] {}x{} cells of {:.6} degrees, {} accidents counted, max {} per cell",
        grid.columns(), grid.rows(), grid.cell_size(), grid.total(), grid.max_count());
    if grid.outside() > 0 {
        warn!("[grid] {} accidents outside the boundary extent were not counted", grid.outside());
    }

    info!("[grid] writing {:?} to {}", args.format, args.output.display());
    write_atomic(&args.output, args.force, |out| match args.format {
        GridFormat::Geojson => write_json(&grid_to_geojson(&grid), out),
        GridFormat::Svg => write_grid_svg(out, &grid, &outlines, args.width, SVG_MARGIN),
    })
}
