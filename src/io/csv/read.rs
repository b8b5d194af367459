//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use geo::Coord;
use log::warn;
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

use crate::data::{Accident, DatasetLayout};

/// Reads a delimited file with a header row into a DataFrame of string columns.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(delimiter))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads delimited text from memory, same options as `read_delimited`.
pub fn read_delimited_str(csv: &str, delimiter: u8) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(delimiter))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes().to_vec()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")
}

/// Get a column as optional strings; a missing column is an error.
fn strings<'a>(df: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>> {
    let column = df.column(name)
        .with_context(|| format!("[io::csv::read] missing column {name:?}"))?;
    let values = column.str()
        .with_context(|| format!("[io::csv::read] column {name:?} is not text"))?;
    Ok(values.into_iter().collect())
}

/// Get an optional column; `None` if no name was configured.
fn optional_strings<'a>(df: &'a DataFrame, name: Option<&str>) -> Result<Option<Vec<Option<&'a str>>>> {
    name.map(|name| strings(df, name)).transpose()
}

#[inline]
fn parse_number(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Years may be written as "2011" or "2011.0".
#[inline]
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    value.parse::<i32>().ok()
        .or_else(|| value.parse::<f64>().ok().filter(|v| v.fract() == 0.0).map(|v| v as i32))
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Map the rows of an accident table to records. Rows with a missing or unparsable
/// coordinate are skipped; the number skipped is returned alongside the records.
pub fn read_accidents(df: &DataFrame, layout: &DatasetLayout) -> Result<(Vec<Accident>, usize)> {
    let east = strings(df, &layout.east)?;
    let north = strings(df, &layout.north)?;
    let year = optional_strings(df, layout.year.as_deref())?;
    let kind = optional_strings(df, layout.kind.as_deref())?;
    let road_type = optional_strings(df, layout.road_type.as_deref())?;
    let region = optional_strings(df, layout.region.as_deref())?;

    fn cell<'a>(column: &Option<Vec<Option<&'a str>>>, i: usize) -> Option<&'a str> {
        column.as_ref().and_then(|c| c[i])
    }

    let mut accidents = Vec::with_capacity(df.height());
    let mut skipped = 0;
    for i in 0..df.height() {
        let (Some(x), Some(y)) = (parse_number(east[i]), parse_number(north[i])) else {
            skipped += 1;
            continue
        };
        accidents.push(Accident {
            location: Coord { x, y },
            year: cell(&year, i).and_then(parse_year),
            kind: non_empty(cell(&kind, i)),
            road_type: non_empty(cell(&road_type, i)),
            region: non_empty(cell(&region, i)),
        });
    }

    if skipped > 0 {
        warn!("[io::csv::read] skipped {skipped} of {} rows without usable coordinates", df.height());
    }
    Ok((accidents, skipped))
}
