use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geojson::{GeoJson, Value};
use thiserror::Error;

use super::model::{BurdenDataset, BurdenRecord, CountryGeometry, Metric, Polygon, Shape, World};

/// CSV header of the country name column (join key).
pub const COUNTRY_COLUMN: &str = "Country or territory name";
/// CSV header of the WHO region code column.
pub const REGION_COLUMN: &str = "Region";
/// CSV header of the year column.
pub const YEAR_COLUMN: &str = "Year";

/// GeoJSON feature property holding the long-form country name.
pub const NAME_PROPERTY: &str = "name_long";

/// Natural Earth 1:50m admin-0 countries.
pub const DEFAULT_GEOMETRY_URL: &str =
    "https://d2ad6b4ur7yvpq.cloudfront.net/naturalearth-3.3.0/ne_50m_admin_0_countries.geojson";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can stop the dashboard from starting.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: year '{value}' is not a four-digit year")]
    InvalidYear { line: usize, value: String },

    #[error("line {line}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("failed to fetch geometry from {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("geometry source is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("geometry source has no Polygon/MultiPolygon feature with a 'name_long' property")]
    EmptyGeometry,
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load the burden table from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<BurdenDataset> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse the burden table from any CSV reader.
///
/// Only the country, region, year and three metric columns are read; any
/// other column is ignored. Empty cells, `NA`, `NaN` and negative values are
/// treated as missing.
pub fn read_csv<R: Read>(reader: R) -> Result<BurdenDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };

    let country_idx = column(COUNTRY_COLUMN)?;
    let region_idx = column(REGION_COLUMN)?;
    let year_idx = column(YEAR_COLUMN)?;
    let metric_idx = [
        column(Metric::Prevalence.column())?,
        column(Metric::Mortality.column())?,
        column(Metric::Incidence.column())?,
    ];

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        // Header is line 1.
        let line = row_no + 2;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let year = parse_year(cell(year_idx), line)?;
        let [prevalence, mortality, incidence] = [0, 1, 2].map(|i| {
            parse_metric(cell(metric_idx[i]), line, Metric::ALL[i].column())
        });

        records.push(BurdenRecord {
            country: cell(country_idx).to_string(),
            region: cell(region_idx).to_string(),
            year,
            prevalence: prevalence?,
            mortality: mortality?,
            incidence: incidence?,
        });
    }

    let dataset = BurdenDataset::from_records(records);
    log::info!(
        "Loaded {} burden records: {} countries, {} regions, years {:?}",
        dataset.len(),
        dataset.countries.len(),
        dataset.regions.len(),
        dataset.year_range()
    );
    Ok(dataset)
}

fn parse_year(s: &str, line: usize) -> Result<i32> {
    let invalid = || LoadError::InvalidYear {
        line,
        value: s.to_string(),
    };
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    s.parse::<i32>().map_err(|_| invalid())
}

fn parse_metric(s: &str, line: usize, column: &'static str) -> Result<Option<f64>> {
    if s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value = s.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        line,
        column,
        value: s.to_string(),
    })?;
    if value.is_nan() || value < 0.0 {
        log::debug!("line {line}: treating '{s}' in '{column}' as missing");
        return Ok(None);
    }
    Ok(Some(value))
}

// ---------------------------------------------------------------------------
// GeoJSON loader
// ---------------------------------------------------------------------------

/// Where the world geometry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometrySource {
    Url(String),
    Path(PathBuf),
}

impl GeometrySource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            GeometrySource::Url(location.to_string())
        } else {
            GeometrySource::Path(PathBuf::from(location))
        }
    }
}

impl Default for GeometrySource {
    fn default() -> Self {
        GeometrySource::Url(DEFAULT_GEOMETRY_URL.to_string())
    }
}

impl fmt::Display for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometrySource::Url(url) => f.write_str(url),
            GeometrySource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the world geometry, fetching it over HTTP when the source is a URL.
pub fn load_geometry(source: &GeometrySource) -> Result<World> {
    let text = match source {
        GeometrySource::Url(url) => fetch_text(url)?,
        GeometrySource::Path(path) => {
            std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?
        }
    };
    let world = parse_geometry(&text)?;
    log::info!("Loaded {} country geometries from {source}", world.len());
    Ok(world)
}

fn fetch_text(url: &str) -> Result<String> {
    let fetch = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(fetch)
}

/// Parse a GeoJSON FeatureCollection into country geometries.
///
/// Features without a `name_long` property or with a geometry other than
/// Polygon/MultiPolygon are skipped. A collection with no usable feature is
/// an error.
pub fn parse_geometry(text: &str) -> Result<World> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(fc) = geojson else {
        return Err(LoadError::NotFeatureCollection);
    };

    let mut world = Vec::with_capacity(fc.features.len());
    for (i, feature) in fc.features.into_iter().enumerate() {
        let Some(name) = feature
            .property(NAME_PROPERTY)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
        else {
            log::debug!("feature {i}: no '{NAME_PROPERTY}' property, skipped");
            continue;
        };

        let polygons = match feature.geometry.map(|g| g.value) {
            Some(Value::Polygon(rings)) => vec![convert_polygon(&rings)],
            Some(Value::MultiPolygon(polygons)) => {
                polygons.iter().map(|rings| convert_polygon(rings)).collect()
            }
            _ => {
                log::debug!("feature {i} ({name}): not a Polygon/MultiPolygon, skipped");
                continue;
            }
        };

        world.push(CountryGeometry {
            name_long: name,
            shape: Arc::new(Shape::new(polygons)),
        });
    }

    if world.is_empty() {
        return Err(LoadError::EmptyGeometry);
    }
    Ok(world)
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Polygon {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| [pos[0], pos[1]])
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn header() -> String {
        format!(
            "{COUNTRY_COLUMN},ISO 2-character country/territory code,{REGION_COLUMN},{YEAR_COLUMN},\"{}\",\"{}\",\"{}\"",
            Metric::Prevalence.column(),
            Metric::Mortality.column(),
            Metric::Incidence.column()
        )
    }

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let csv = format!(
            "{}\nAfghanistan,AF,EMR,1990,327,37,189\nIndia,IN,SEA,1990,465,,216\n",
            header()
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let india = &ds.records[1];
        assert_eq!(india.country, "India");
        assert_eq!(india.region, "SEA");
        assert_eq!(india.year, 1990);
        assert_eq!(india.prevalence, Some(465.0));
        assert_eq!(india.mortality, None);
        assert_eq!(india.incidence, Some(216.0));
    }

    #[test]
    fn missing_value_sentinels_load_as_none() {
        let csv = format!("{}\nX,XX,AFR,2000,NA,NaN,-1\n", header());
        let ds = read_csv(csv.as_bytes()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.prevalence, None);
        assert_eq!(rec.mortality, None);
        assert_eq!(rec.incidence, None);
    }

    #[test]
    fn missing_column_names_the_column() {
        let csv = "Country or territory name,Region,Year\nIndia,SEA,1990\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == Metric::Prevalence.column()));
        assert!(err.to_string().contains("Estimated prevalence"));
    }

    #[test]
    fn bad_year_fails_with_line_number() {
        let csv = format!("{}\nIndia,IN,SEA,1990,1,1,1\nIndia,IN,SEA,nineteen,1,1,1\n", header());
        match read_csv(csv.as_bytes()) {
            Err(LoadError::InvalidYear { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "nineteen");
            }
            other => panic!("expected InvalidYear, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_metric_fails() {
        let csv = format!("{}\nIndia,IN,SEA,1990,lots,1,1\n", header());
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn load_csv_reads_from_disk_and_reports_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header()).unwrap();
        writeln!(file, "France,FR,EUR,1995,20,1.5,18").unwrap();
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.countries, ["France"]);

        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name_long": "France"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature", "properties": {"name_long": "Fiji"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                 [[[0,0],[1,0],[1,1],[0,0]]],
                 [[[5,5],[6,5],[6,6],[5,5]]]
             ]}},
            {"type": "Feature", "properties": {"name": "Nowhere"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
            {"type": "Feature", "properties": {"name_long": "Dot"},
             "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]
    }"#;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let world = parse_geometry(WORLD).unwrap();
        let names: Vec<_> = world.iter().map(|g| g.name_long.as_str()).collect();
        assert_eq!(names, ["France", "Fiji"]);
        assert_eq!(world[0].shape.polygons().len(), 1);
        assert_eq!(world[1].shape.polygons().len(), 2);
        assert_eq!(world[0].shape.polygons()[0][0][2], [1.0, 1.0]);
    }

    #[test]
    fn rejects_non_collection_and_empty_geometry() {
        let single = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        assert!(matches!(parse_geometry(single), Err(LoadError::NotFeatureCollection)));

        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(parse_geometry(empty), Err(LoadError::EmptyGeometry)));

        assert!(matches!(parse_geometry("not json"), Err(LoadError::GeoJson(_))));
    }

    #[test]
    fn geometry_source_dispatches_on_scheme() {
        assert_eq!(
            GeometrySource::parse("https://example.org/world.geojson"),
            GeometrySource::Url("https://example.org/world.geojson".into())
        );
        assert_eq!(
            GeometrySource::parse("data/world.geojson"),
            GeometrySource::Path(PathBuf::from("data/world.geojson"))
        );
        assert_eq!(GeometrySource::default().to_string(), DEFAULT_GEOMETRY_URL);
    }

    #[test]
    fn load_geometry_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WORLD.as_bytes()).unwrap();
        let world = load_geometry(&GeometrySource::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(world.len(), 2);
    }
}
