use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::model::{BurdenDataset, BurdenRecord, CountryGeometry, Metric};

// ---------------------------------------------------------------------------
// FilterSelection – the user's current control values
// ---------------------------------------------------------------------------

/// Countries preselected when the dashboard opens.
pub const DEFAULT_COUNTRIES: [&str; 2] = ["Afghanistan", "India"];
/// Region preselected when the dashboard opens.
pub const DEFAULT_REGION: &str = "EUR";

/// Current values of the country, region and year controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub region: String,
    pub year: i32,
}

impl FilterSelection {
    /// Initial selection for a dataset: the default countries, the default
    /// region and the earliest year.
    pub fn initial(dataset: &BurdenDataset) -> Self {
        FilterSelection {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            region: DEFAULT_REGION.to_string(),
            year: dataset.year_range().map(|(min, _)| min).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// Keep rows whose country is in `countries`. An empty set keeps nothing.
pub fn filter_by_countries<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    countries: &BTreeSet<String>,
) -> Vec<&'a BurdenRecord> {
    records
        .into_iter()
        .filter(|r| countries.contains(&r.country))
        .collect()
}

/// Keep rows whose region code equals `region` exactly.
pub fn filter_by_region<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    region: &str,
) -> Vec<&'a BurdenRecord> {
    records.into_iter().filter(|r| r.region == region).collect()
}

pub fn filter_by_year<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    year: i32,
) -> Vec<&'a BurdenRecord> {
    records.into_iter().filter(|r| r.year == year).collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort by `metric` and keep the first `n` rows.
///
/// The sort is stable, so rows with equal values stay in input order.
/// Missing values go last whichever the direction.
pub fn top_n_by_field<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    metric: Metric,
    n: usize,
    descending: bool,
) -> Vec<&'a BurdenRecord> {
    let mut rows: Vec<&BurdenRecord> = records.into_iter().collect();
    rows.sort_by(|a, b| match (a.metric(metric), b.metric(metric)) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows.truncate(n);
    rows
}

// ---------------------------------------------------------------------------
// Geometry join
// ---------------------------------------------------------------------------

/// One geometry with the burden record joined onto it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRow<'a> {
    pub geometry: &'a CountryGeometry,
    /// `None` when no record carries this geometry's name.
    pub record: Option<&'a BurdenRecord>,
}

/// Left join of records onto geometries by exact country name.
///
/// Geometry is the authoritative side: the output has one row per geometry
/// in geometry order, and records with no matching geometry are dropped.
/// When several records share a name the first one wins.
pub fn join_geometry<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    geometries: &'a [CountryGeometry],
) -> Vec<JoinedRow<'a>> {
    let mut by_name: HashMap<&str, &BurdenRecord> = HashMap::new();
    for rec in records {
        by_name.entry(rec.country.as_str()).or_insert(rec);
    }

    geometries
        .iter()
        .map(|geometry| JoinedRow {
            geometry,
            record: by_name.get(geometry.name_long.as_str()).copied(),
        })
        .collect()
}

/// Distinct record countries that no geometry is named after, in
/// first-appearance order.
pub fn unmatched_countries<'a>(
    records: impl IntoIterator<Item = &'a BurdenRecord>,
    geometries: &[CountryGeometry],
) -> Vec<&'a str> {
    let names: HashSet<&str> = geometries.iter().map(|g| g.name_long.as_str()).collect();
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|r| r.country.as_str())
        .filter(|c| !names.contains(c) && seen.insert(*c))
        .collect()
}
