use anyhow::{bail, Result};
use log::{info, warn};
use unfallkarte::{
    data::RegionYearTable,
    io::{geojson::{choropleth_to_geojson, write_json}, read_accident_file, write::write_atomic},
    MixedGeometryPolicy,
};

use super::{convert_boundaries, layout_for, load_boundaries};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ChoroplethArgs) -> Result<()> {
    let layout = layout_for(&args.accidents, &args.layout)?;
    if layout.region.is_none() || layout.road_type.is_none() {
        bail!("The selected dataset has no region or road type column; pass --region-column and --road-type-column");
    }

    // Only attributes are joined, so locations stay in their source CRS.
    let accidents = read_accident_file(&args.accidents, &layout)?;
    let table = RegionYearTable::from_accidents(&accidents, layout.region_codes);
    let rows = table.year(args.year).count();
    if rows == 0 { warn!("[choropleth] no accidents recorded for {}", args.year) }
    info!("[choropleth] {rows} regions with accidents in {}", args.year);

    let boundaries = load_boundaries(&args.boundary, &args.name_field, None)?;
    let regions = convert_boundaries(&boundaries, MixedGeometryPolicy::Skip)?;

    let value = choropleth_to_geojson(regions.iter().map(|(name, shape)| (name.as_str(), shape)), &table, args.year);

    info!("[choropleth] writing GeoJSON to {}", args.output.display());
    write_atomic(&args.output, args.force, |out| write_json(&value, out))
}
