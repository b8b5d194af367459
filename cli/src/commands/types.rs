use anyhow::{bail, Context, Result};
use log::info;
use unfallkarte::{
    data::TypeYearTable,
    io::{csv::write_csv, geojson::write_json, read_accident_file, write::write_atomic},
};

use super::layout_for;
use crate::cli::TableFormat;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::TypesArgs) -> Result<()> {
    let layout = layout_for(&args.accidents, &args.layout)?;
    if layout.kind.is_none() {
        bail!("The selected dataset has no accident type column; pass --type-column");
    }

    let accidents = read_accident_file(&args.accidents, &layout)?;
    let table = TypeYearTable::from_accidents(&accidents, args.translate);
    if table.is_empty() {
        bail!("No accidents with both a year and a type in {}", args.accidents.display());
    }
    info!("[types] {} types over {} years", table.types().len(), table.years().len());

    info!("[types] writing {:?} to {}", args.format, args.output.display());
    match args.format {
        TableFormat::Csv => {
            let mut df = table.to_dataframe().context("[types] Failed to build table")?;
            write_atomic(&args.output, args.force, |out| write_csv(&mut df, out))
        }
        TableFormat::Json => write_atomic(&args.output, args.force, |out| write_json(&table.to_json(), out)),
    }
}
