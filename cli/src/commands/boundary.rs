use anyhow::Result;
use log::info;
use unfallkarte::io::{geojson::{boundaries_to_geojson, write_json}, write::write_atomic};

use super::{convert_boundaries, load_boundaries};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::BoundaryArgs) -> Result<()> {
    info!("[boundary] loading boundaries from {}", args.shapefile.display());
    let boundaries = load_boundaries(&args.shapefile, &args.name_field, args.filter.as_deref())?;

    let converted = convert_boundaries(&boundaries, args.policy.into())?;

    let value = boundaries_to_geojson(converted.iter().map(|(name, shape)| (name.as_str(), shape)));

    info!("[boundary] writing GeoJSON to {}", args.output.display());
    write_atomic(&args.output, args.force, |out| write_json(&value, out))
}
