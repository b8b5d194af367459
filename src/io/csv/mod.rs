//! CSV format reading and writing operations.

mod read;
mod write;

pub(crate) use read::parse_year;
pub use read::{read_accidents, read_delimited, read_delimited_str};
pub use write::write_csv;
