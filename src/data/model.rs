use std::collections::BTreeSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Metric – the three numeric burden columns
// ---------------------------------------------------------------------------

/// One of the numeric burden estimates carried by every [`BurdenRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Prevalence,
    Mortality,
    Incidence,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Prevalence, Metric::Mortality, Metric::Incidence];

    /// Header of the source CSV column holding this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Prevalence => "Estimated prevalence of TB (all forms) per 100 000 population",
            Metric::Mortality => {
                "Estimated mortality of TB cases (all forms, excluding HIV) per 100 000 population"
            }
            Metric::Incidence => "Estimated incidence (all forms) per 100 000 population",
        }
    }

    /// Short axis label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Prevalence => "Prevalence per 100k",
            Metric::Mortality => "Mortality per 100k (excl. HIV)",
            Metric::Incidence => "Incidence per 100k",
        }
    }
}

// ---------------------------------------------------------------------------
// BurdenRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// TB burden estimates for one country in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct BurdenRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    /// `None` is the missing-data sentinel.
    pub prevalence: Option<f64>,
    pub mortality: Option<f64>,
    pub incidence: Option<f64>,
}

impl BurdenRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Prevalence => self.prevalence,
            Metric::Mortality => self.mortality,
            Metric::Incidence => self.incidence,
        }
    }
}

// ---------------------------------------------------------------------------
// BurdenDataset – the complete loaded CSV
// ---------------------------------------------------------------------------

/// The parsed burden table with pre-computed option lists for the controls.
#[derive(Debug, Clone, Default)]
pub struct BurdenDataset {
    /// All rows, in source order.
    pub records: Vec<BurdenRecord>,
    /// Distinct countries in first-appearance order.
    pub countries: Vec<String>,
    /// Distinct region codes in first-appearance order.
    pub regions: Vec<String>,
    /// Distinct years, ascending.
    pub years: Vec<i32>,
}

impl BurdenDataset {
    /// Build the option indices from the loaded records.
    pub fn from_records(records: Vec<BurdenRecord>) -> Self {
        let mut countries = Vec::new();
        let mut regions = Vec::new();
        let mut seen_countries = BTreeSet::new();
        let mut seen_regions = BTreeSet::new();
        let mut years = BTreeSet::new();

        for rec in &records {
            if seen_countries.insert(rec.country.as_str()) {
                countries.push(rec.country.clone());
            }
            if seen_regions.insert(rec.region.as_str()) {
                regions.push(rec.region.clone());
            }
            years.insert(rec.year);
        }

        BurdenDataset {
            countries,
            regions,
            years: years.into_iter().collect(),
            records,
        }
    }

    /// Smallest and largest year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A closed ring of `[lon, lat]` positions.
pub type Ring = Vec<[f64; 2]>;

/// Polygon rings: the first is the exterior, the rest are holes.
pub type Polygon = Vec<Ring>;

/// Lon/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// The outline of one country as a set of polygons.
///
/// Each polygon's bounding box is computed once at construction, so
/// containment tests skip polygons far from the point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    polygons: Vec<Polygon>,
    bounds: Vec<Option<BBox>>,
}

impl Shape {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let bounds = polygons
            .iter()
            .map(|p| p.first().and_then(|ring| ring_bbox(ring)))
            .collect();
        Shape { polygons, bounds }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Bounding box over every exterior ring, `None` for an empty shape.
    pub fn bbox(&self) -> Option<BBox> {
        self.bounds.iter().flatten().copied().reduce(|a, b| BBox {
            min_lon: a.min_lon.min(b.min_lon),
            min_lat: a.min_lat.min(b.min_lat),
            max_lon: a.max_lon.max(b.max_lon),
            max_lat: a.max_lat.max(b.max_lat),
        })
    }

    /// Even-odd containment test over all rings, so holes are excluded.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons
            .iter()
            .zip(&self.bounds)
            .filter(|(_, bbox)| bbox.is_some_and(|b| b.contains(lon, lat)))
            .any(|(polygon, _)| {
                polygon
                    .iter()
                    .filter(|ring| ring_contains(ring, lon, lat))
                    .count()
                    % 2
                    == 1
            })
    }
}

fn ring_bbox(ring: &[[f64; 2]]) -> Option<BBox> {
    let (first, rest) = ring.split_first()?;
    let init = BBox {
        min_lon: first[0],
        min_lat: first[1],
        max_lon: first[0],
        max_lat: first[1],
    };
    Some(rest.iter().fold(init, |b, p| BBox {
        min_lon: b.min_lon.min(p[0]),
        min_lat: b.min_lat.min(p[1]),
        max_lon: b.max_lon.max(p[0]),
        max_lat: b.max_lat.max(p[1]),
    }))
}

/// Ray-casting point-in-ring test.
fn ring_contains(ring: &[[f64; 2]], lon: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// One feature of the world geometry source.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGeometry {
    /// Long-form country name, the join key against [`BurdenRecord::country`].
    pub name_long: String,
    /// Shared so chart specs can hold it without copying coordinates.
    pub shape: Arc<Shape>,
}

/// All country geometries, in source order.
pub type World = Vec<CountryGeometry>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, region: &str, year: i32) -> BurdenRecord {
        BurdenRecord {
            country: country.to_string(),
            region: region.to_string(),
            year,
            prevalence: Some(1.0),
            mortality: None,
            incidence: Some(2.0),
        }
    }

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        vec![
            [x0, y0],
            [x0 + size, y0],
            [x0 + size, y0 + size],
            [x0, y0 + size],
            [x0, y0],
        ]
    }

    #[test]
    fn dataset_indices_keep_first_appearance_order() {
        let ds = BurdenDataset::from_records(vec![
            record("India", "SEA", 1991),
            record("Afghanistan", "EMR", 1990),
            record("India", "SEA", 1990),
            record("Albania", "EUR", 1992),
        ]);
        assert_eq!(ds.countries, ["India", "Afghanistan", "Albania"]);
        assert_eq!(ds.regions, ["SEA", "EMR", "EUR"]);
        assert_eq!(ds.years, [1990, 1991, 1992]);
        assert_eq!(ds.year_range(), Some((1990, 1992)));
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn empty_dataset_has_no_year_range() {
        let ds = BurdenDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_range(), None);
    }

    #[test]
    fn metric_accessor_reads_matching_field() {
        let rec = record("India", "SEA", 1990);
        assert_eq!(rec.metric(Metric::Prevalence), Some(1.0));
        assert_eq!(rec.metric(Metric::Mortality), None);
        assert_eq!(rec.metric(Metric::Incidence), Some(2.0));
    }

    #[test]
    fn shape_contains_respects_holes() {
        let shape = Shape::new(vec![vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]]);
        assert!(shape.contains(1.0, 1.0));
        assert!(!shape.contains(5.0, 5.0));
        assert!(!shape.contains(11.0, 5.0));
    }

    #[test]
    fn shape_bbox_spans_all_polygons() {
        let shape = Shape::new(vec![vec![square(0.0, 0.0, 1.0)], vec![square(10.0, -5.0, 2.0)]]);
        let bbox = shape.bbox().unwrap();
        assert_eq!(bbox.min_lon, 0.0);
        assert_eq!(bbox.min_lat, -5.0);
        assert_eq!(bbox.max_lon, 12.0);
        assert_eq!(bbox.max_lat, 1.0);
        assert!(Shape::default().bbox().is_none());
    }

    #[test]
    fn contains_checks_each_polygon_separately() {
        // Two islands far apart: a point between them is in neither bbox.
        let shape = Shape::new(vec![
            vec![square(-170.0, 60.0, 10.0)],
            vec![square(170.0, 60.0, 5.0)],
        ]);
        assert!(shape.contains(-165.0, 65.0));
        assert!(shape.contains(172.0, 62.0));
        assert!(!shape.contains(0.0, 65.0));
        assert_eq!(shape.polygons().len(), 2);
    }
}
