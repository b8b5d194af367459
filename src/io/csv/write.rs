//! CSV writing operations.

use std::io::Write;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::CsvWriter};

/// Write a DataFrame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, writer: impl Write) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .finish(df)
        .context("[io::csv::write] Failed to write CSV")
}
