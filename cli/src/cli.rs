use std::path::PathBuf;

/// Accident map CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "unfallkarte", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Convert boundary polygons from LV95 to WGS84 GeoJSON (forbids stdout)
    Boundary(BoundaryArgs),

    /// Count accidents on a square grid (forbids stdout)
    Grid(GridArgs),

    /// Tabulate accidents per year and accident type (forbids stdout)
    Types(TypesArgs),

    /// Join road-type counts for one year onto region boundaries (forbids stdout)
    Choropleth(ChoroplethArgs),
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Drop non-polygon geometries and continue
    Skip,
    /// Fail on the first non-polygon geometry
    Reject,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Basel-Stadt open data export (`;`, German headers)
    Basel,
    /// Federal accident locations (`,`, English headers)
    Switzerland,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Detect from the first accident location
    Auto,
    /// Swiss LV95 (EPSG:2056)
    Lv95,
    /// WGS84 lon/lat (EPSG:4326)
    Wgs84,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat { Geojson, Svg }

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat { Csv, Json }

/// Column overrides for tabular accident files.
#[derive(clap::Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Accident dataset layout
    #[arg(long, value_enum, default_value_t = Dataset::Basel)]
    pub dataset: Dataset,

    /// Coordinate system of the accident locations
    #[arg(long, value_enum, default_value_t = Crs::Auto)]
    pub crs: Crs,

    /// Field delimiter, overrides the dataset default
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Easting / longitude column
    #[arg(long)]
    pub east_column: Option<String>,

    /// Northing / latitude column
    #[arg(long)]
    pub north_column: Option<String>,

    /// Year column
    #[arg(long)]
    pub year_column: Option<String>,

    /// Accident type column
    #[arg(long)]
    pub type_column: Option<String>,

    /// Road type column
    #[arg(long)]
    pub road_type_column: Option<String>,

    /// Region code column
    #[arg(long)]
    pub region_column: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct BoundaryArgs {
    /// Input polygon shapefile in LV95
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub shapefile: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Attribute holding the region name
    #[arg(long, default_value = "NAME")]
    pub name_field: String,

    /// Keep only regions whose name contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// What to do with non-polygon geometries
    #[arg(long, value_enum, default_value_t = Policy::Skip)]
    pub policy: Policy,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct GridArgs {
    /// Accident file (.csv or point .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub accidents: PathBuf,

    /// Output file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Number of cells across the extent
    #[arg(long, default_value_t = 75)]
    pub cells: usize,

    /// Boundary shapefile; its extent replaces the accidents' own
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub boundary: Option<PathBuf>,

    /// Attribute holding the boundary name
    #[arg(long, default_value = "NAME")]
    pub name_field: String,

    /// Keep only boundaries whose name contains this text
    #[arg(long, requires = "boundary")]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = GridFormat::Geojson)]
    pub format: GridFormat,

    /// SVG width in pixels
    #[arg(long, default_value_t = 1200.0, value_parser = parse_width)]
    pub width: f64,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

/// SVG widths must leave room for the drawing inside the margins.
fn parse_width(value: &str) -> Result<f64, String> {
    let width = value.parse::<f64>().map_err(|e| e.to_string())?;
    if width.is_finite() && width >= 100.0 {
        Ok(width)
    } else {
        Err(format!("width must be at least 100 pixels, got {value}"))
    }
}

#[derive(clap::Args, Debug)]
pub struct TypesArgs {
    /// Accident file (.csv or point .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub accidents: PathBuf,

    /// Output file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
    pub format: TableFormat,

    /// Replace German accident types with English labels
    #[arg(long)]
    pub translate: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct ChoroplethArgs {
    /// Region boundary shapefile in LV95
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundary: PathBuf,

    /// Accident file (.csv or point .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub accidents: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Year to join onto the boundaries
    #[arg(long)]
    pub year: i32,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Attribute holding the region name
    #[arg(long, default_value = "NAME")]
    pub name_field: String,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
