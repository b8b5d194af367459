//! Group-and-count tables over accident records.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use polars::{frame::DataFrame, prelude::{NamedFrom, PolarsResult}, series::Series};
use serde_json::{json, Map, Value};

use crate::data::{translate_accident_type, Accident, RegionCodes};

/// Accidents per (year, accident type), zero-filled over every observed year and type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeYearTable {
    years: Vec<i32>,
    types: Vec<String>,
    counts: Vec<Vec<u32>>, // [type][year]
}

impl TypeYearTable {
    /// Build the table from records carrying both a year and a type. With `translate`,
    /// German type descriptions are replaced by their English labels before grouping.
    pub fn from_accidents(accidents: &[Accident], translate: bool) -> Self {
        let mut groups: BTreeMap<(String, i32), u32> = BTreeMap::new();
        let mut years = BTreeSet::new();
        let mut skipped = 0usize;

        for accident in accidents {
            let (Some(year), Some(kind)) = (accident.year, accident.kind.as_deref()) else {
                skipped += 1;
                continue
            };
            let kind = if translate { translate_accident_type(kind) } else { kind };
            years.insert(year);
            *groups.entry((kind.to_string(), year)).or_default() += 1;
        }
        if skipped > 0 { debug!("[data::stats] {skipped} records without year or type") }

        let years = years.into_iter().collect::<Vec<_>>();
        let types = groups.keys().map(|(kind, _)| kind.clone())
            .collect::<BTreeSet<_>>().into_iter().collect::<Vec<_>>();

        let counts = types.iter()
            .map(|kind| years.iter()
                .map(|&year| groups.get(&(kind.clone(), year)).copied().unwrap_or(0))
                .collect())
            .collect();

        Self { years, types, counts }
    }

    #[inline] pub fn years(&self) -> &[i32] { &self.years }

    #[inline] pub fn types(&self) -> &[String] { &self.types }

    #[inline] pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn count(&self, year: i32, kind: &str) -> Option<u32> {
        let y = self.years.iter().position(|&y| y == year)?;
        let t = self.types.iter().position(|t| t == kind)?;
        Some(self.counts[t][y])
    }

    /// Counts for one type, ordered by year.
    pub fn series(&self, kind: &str) -> Option<&[u32]> {
        let t = self.types.iter().position(|t| t == kind)?;
        Some(&self.counts[t])
    }

    /// Long format: one row per (year, type), sorted by year then type.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut years = Vec::with_capacity(self.years.len() * self.types.len());
        let mut types = Vec::with_capacity(years.capacity());
        let mut counts = Vec::with_capacity(years.capacity());

        for (y, &year) in self.years.iter().enumerate() {
            for (t, kind) in self.types.iter().enumerate() {
                years.push(year);
                types.push(kind.as_str());
                counts.push(self.counts[t][y]);
            }
        }

        DataFrame::new(vec![
            Series::new("year".into(), years).into(),
            Series::new("type".into(), types).into(),
            Series::new("count".into(), counts).into(),
        ])
    }

    /// Column format for stacked bar charts: `{"years": [...], "<type>": [count per year]}`.
    pub fn to_json(&self) -> Value {
        let mut columns = Map::new();
        columns.insert("years".into(), json!(self.years.iter().map(|y| y.to_string()).collect::<Vec<_>>()));
        for (kind, counts) in self.types.iter().zip(&self.counts) {
            columns.insert(kind.clone(), json!(counts));
        }
        Value::Object(columns)
    }
}

/// Counts for one (region, year) row of a `RegionYearTable`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionYearRow {
    counts: BTreeMap<String, u32>,
}

impl RegionYearRow {
    pub fn count(&self, road_type: &str) -> u32 {
        self.counts.get(road_type).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, u32> { &self.counts }

    /// Sum over every road type.
    pub fn total(&self) -> u32 { self.counts.values().sum() }
}

/// Accidents per (region, year, road type). Every observed (region, year) row carries a
/// zero-filled count for every observed road type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionYearTable {
    road_types: Vec<String>,
    rows: BTreeMap<(String, i32), RegionYearRow>,
}

impl RegionYearTable {
    pub fn from_accidents(accidents: &[Accident], codes: RegionCodes) -> Self {
        let mut road_types = BTreeSet::new();
        let mut rows: BTreeMap<(String, i32), RegionYearRow> = BTreeMap::new();
        let mut unknown = 0usize;

        for accident in accidents {
            let (Some(code), Some(year), Some(road_type)) =
                (accident.region.as_deref(), accident.year, accident.road_type.as_deref()) else { continue };
            let Some(name) = codes.name(code) else {
                unknown += 1;
                continue
            };
            road_types.insert(road_type.to_string());
            *rows.entry((name.to_string(), year)).or_default()
                .counts.entry(road_type.to_string()).or_default() += 1;
        }
        if unknown > 0 { debug!("[data::stats] {unknown} records with unknown region code") }

        for row in rows.values_mut() {
            for road_type in &road_types {
                row.counts.entry(road_type.clone()).or_insert(0);
            }
        }

        Self { road_types: road_types.into_iter().collect(), rows }
    }

    #[inline] pub fn road_types(&self) -> &[String] { &self.road_types }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn row(&self, region: &str, year: i32) -> Option<&RegionYearRow> {
        self.rows.get(&(region.to_string(), year))
    }

    /// Rows of a single year, keyed by region name.
    pub fn year(&self, year: i32) -> impl Iterator<Item = (&str, &RegionYearRow)> {
        self.rows.iter()
            .filter(move |((_, y), _)| *y == year)
            .map(|((region, _), row)| (region.as_str(), row))
    }
}
