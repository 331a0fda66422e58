use crate::data::filter::JoinedRow;
use crate::data::model::{BurdenRecord, Metric};

use super::spec::{
    Bar, ChartKind, ChartSpec, ColorEncoding, ColorScale, Field, Marks, Orientation, Region,
    Series,
};

/// Number of bars in the top-countries chart.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Page – the two presentations of the same charts
// ---------------------------------------------------------------------------

/// The dashboard page a chart is built for.
///
/// Both pages show the same data. The vanilla page titles every chart; the
/// styled page leaves titles to its card headers and uses a blue palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Vanilla,
    Styled,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Vanilla, Page::Styled];

    pub fn label(self) -> &'static str {
        match self {
            Page::Vanilla => "Vanilla",
            Page::Styled => "Bootstrap",
        }
    }

    /// Empty on the styled page, which never shows chart titles.
    fn title(self, text: impl FnOnce() -> String) -> String {
        match self {
            Page::Vanilla => text(),
            Page::Styled => String::new(),
        }
    }

    fn map_scale(self) -> ColorScale {
        match self {
            Page::Vanilla => ColorScale::Plasma,
            Page::Styled => ColorScale::Blues,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// One line per country: `metric` over years, colored by country.
pub fn trend_line(rows: &[&BurdenRecord], metric: Metric, page: Page) -> ChartSpec {
    let mut series = group_by_country(rows, |r| Some([r.year as f64, r.metric(metric)?]));
    for s in &mut series {
        s.points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }

    ChartSpec {
        kind: ChartKind::Line,
        title: page.title(|| format!("TB {} Over Time in Selected Countries", metric_name(metric))),
        x: Field::Year,
        y: Field::Metric(metric),
        color: Some(ColorEncoding::Categorical(Field::Country)),
        orientation: Orientation::Vertical,
        show_legend: true,
        marks: Marks::Series(series),
    }
}

/// One point per row with both metrics present, colored by country.
pub fn scatter(rows: &[&BurdenRecord], x: Metric, y: Metric, page: Page) -> ChartSpec {
    let series = group_by_country(rows, |r| Some([r.metric(x)?, r.metric(y)?]));

    ChartSpec {
        kind: ChartKind::Scatter,
        title: page.title(|| {
            format!(
                "TB {} vs. {} in Selected Countries",
                metric_name(x),
                metric_name(y)
            )
        }),
        x: Field::Metric(x),
        y: Field::Metric(y),
        color: Some(ColorEncoding::Categorical(Field::Country)),
        orientation: Orientation::Vertical,
        show_legend: true,
        marks: Marks::Series(series),
    }
}

/// A single incidence line over the rows of one region, in row order.
///
/// Always holds exactly one series, which is empty when the region has no rows.
pub fn regional_trend(rows: &[&BurdenRecord], region: &str, page: Page) -> ChartSpec {
    let points = rows
        .iter()
        .filter_map(|r| Some([r.year as f64, r.incidence?]))
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        title: page.title(|| format!("TB Incidence Over Time in {region}")),
        x: Field::Year,
        y: Field::Metric(Metric::Incidence),
        color: None,
        orientation: Orientation::Vertical,
        show_legend: false,
        marks: Marks::Series(vec![Series {
            name: region.to_string(),
            points,
        }]),
    }
}

/// Horizontal bars, one per row in the given order. A row missing the
/// metric keeps its country on the axis with an empty bar.
///
/// The styled page also shades the bars by value and hides the legend.
pub fn top_bar(rows: &[&BurdenRecord], metric: Metric, year: i32, page: Page) -> ChartSpec {
    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| Bar {
            category: r.country.clone(),
            value: r.metric(metric),
        })
        .collect();

    let (color, show_legend) = match page {
        Page::Vanilla => (None, true),
        Page::Styled => (
            Some(ColorEncoding::Continuous {
                field: Field::Metric(metric),
                scale: ColorScale::Blues,
                domain: domain(bars.iter().filter_map(|b| b.value)),
            }),
            false,
        ),
    };

    ChartSpec {
        kind: ChartKind::Bar,
        title: page.title(|| {
            format!(
                "Top {TOP_N} Countries with Highest TB {} ({year})",
                metric_name(metric)
            )
        }),
        x: Field::Metric(metric),
        y: Field::Country,
        color,
        orientation: Orientation::Horizontal,
        show_legend,
        marks: Marks::Bars(bars),
    }
}

/// One region per joined geometry, shaded by `metric`.
pub fn choropleth(joined: &[JoinedRow<'_>], metric: Metric, year: i32, page: Page) -> ChartSpec {
    let regions: Vec<Region> = joined
        .iter()
        .map(|row| Region {
            name: row.geometry.name_long.clone(),
            shape: row.geometry.shape.clone(),
            value: row.record.and_then(|r| r.metric(metric)),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Choropleth,
        title: page.title(|| format!("Global TB {} ({year})", metric_name(metric))),
        x: Field::Country,
        y: Field::Metric(metric),
        color: Some(ColorEncoding::Continuous {
            field: Field::Metric(metric),
            scale: page.map_scale(),
            domain: domain(regions.iter().filter_map(|r| r.value)),
        }),
        orientation: Orientation::Vertical,
        show_legend: true,
        marks: Marks::Regions(regions),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn metric_name(metric: Metric) -> &'static str {
    match metric {
        Metric::Prevalence => "Prevalence",
        Metric::Mortality => "Mortality",
        Metric::Incidence => "Incidence",
    }
}

/// Group rows into one series per country, first-appearance order.
/// Rows for which `point` returns `None` are skipped, but their country
/// still gets a (possibly empty) series.
fn group_by_country(
    rows: &[&BurdenRecord],
    point: impl Fn(&BurdenRecord) -> Option<[f64; 2]>,
) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let idx = match series.iter().position(|s| s.name == row.country) {
            Some(idx) => idx,
            None => {
                series.push(Series {
                    name: row.country.clone(),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        if let Some(p) = point(*row) {
            series[idx].points.push(p);
        }
    }
    series
}

fn domain(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{filter_by_region, join_geometry};
    use crate::data::model::{CountryGeometry, Shape};

    fn rec(country: &str, year: i32, prevalence: Option<f64>, mortality: Option<f64>) -> BurdenRecord {
        BurdenRecord {
            country: country.to_string(),
            region: "SEA".to_string(),
            year,
            prevalence,
            mortality,
            incidence: prevalence.map(|p| p / 2.0),
        }
    }

    #[test]
    fn trend_line_has_one_sorted_series_per_country() {
        let records = vec![
            rec("India", 1991, Some(400.0), None),
            rec("Afghanistan", 1990, Some(300.0), None),
            rec("India", 1990, Some(465.0), None),
            rec("Afghanistan", 1991, None, None),
        ];
        let rows: Vec<_> = records.iter().collect();
        let spec = trend_line(&rows, Metric::Prevalence, Page::Vanilla);

        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.x, Field::Year);
        assert_eq!(spec.y, Field::Metric(Metric::Prevalence));
        assert_eq!(spec.color, Some(ColorEncoding::Categorical(Field::Country)));
        assert_eq!(spec.title, "TB Prevalence Over Time in Selected Countries");

        let series = spec.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "India");
        assert_eq!(series[0].points, vec![[1990.0, 465.0], [1991.0, 400.0]]);
        assert_eq!(series[1].name, "Afghanistan");
        assert_eq!(series[1].points, vec![[1990.0, 300.0]]);
    }

    #[test]
    fn scatter_skips_rows_missing_either_metric() {
        let records = vec![
            rec("India", 1990, Some(465.0), Some(40.0)),
            rec("India", 1991, Some(400.0), None),
        ];
        let rows: Vec<_> = records.iter().collect();
        let spec = scatter(&rows, Metric::Prevalence, Metric::Mortality, Page::Vanilla);
        assert_eq!(spec.kind, ChartKind::Scatter);
        assert_eq!(spec.title, "TB Prevalence vs. Mortality in Selected Countries");
        assert_eq!(spec.series()[0].points, vec![[465.0, 40.0]]);
    }

    #[test]
    fn regional_trend_on_empty_region_is_an_empty_series() {
        let records = vec![rec("India", 1990, Some(465.0), None)];
        let rows = filter_by_region(&records, "EUR");
        assert!(rows.is_empty());

        let spec = regional_trend(&rows, "EUR", Page::Vanilla);
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.title, "TB Incidence Over Time in EUR");
        assert_eq!(spec.series().len(), 1);
        assert!(spec.series()[0].points.is_empty());
        assert!(spec.is_blank());
        assert_eq!(spec.color, None);
    }

    #[test]
    fn top_bar_keeps_order_and_styles_per_page() {
        let records = vec![
            rec("India", 1990, Some(465.0), None),
            rec("Afghanistan", 1990, Some(327.0), None),
        ];
        let rows: Vec<_> = records.iter().collect();

        let vanilla = top_bar(&rows, Metric::Prevalence, 1990, Page::Vanilla);
        assert_eq!(vanilla.orientation, Orientation::Horizontal);
        assert_eq!(vanilla.x, Field::Metric(Metric::Prevalence));
        assert_eq!(vanilla.y, Field::Country);
        assert_eq!(vanilla.color, None);
        let names: Vec<_> = vanilla.bars().iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, ["India", "Afghanistan"]);

        let styled = top_bar(&rows, Metric::Prevalence, 1990, Page::Styled);
        assert!(styled.title.is_empty());
        assert!(!styled.show_legend);
        assert_eq!(
            styled.color,
            Some(ColorEncoding::Continuous {
                field: Field::Metric(Metric::Prevalence),
                scale: ColorScale::Blues,
                domain: Some((327.0, 465.0)),
            })
        );
    }

    #[test]
    fn top_bar_keeps_rows_missing_the_metric() {
        let records = vec![
            rec("Afghanistan", 1990, Some(300.0), None),
            rec("Atlantis", 1990, None, None),
        ];
        let rows: Vec<_> = records.iter().collect();
        let spec = top_bar(&rows, Metric::Prevalence, 1990, Page::Styled);

        assert_eq!(spec.bars().len(), rows.len());
        assert_eq!(spec.bars()[1].category, "Atlantis");
        assert_eq!(spec.bars()[1].value, None);
        assert!(!spec.is_blank());
        assert!(matches!(
            spec.color,
            Some(ColorEncoding::Continuous { domain: Some((lo, hi)), .. }) if lo == 300.0 && hi == 300.0
        ));
    }

    #[test]
    fn choropleth_leaves_unmatched_regions_without_value() {
        let records = vec![rec("France", 2000, Some(15.0), None)];
        let geometries = vec![
            CountryGeometry {
                name_long: "France".into(),
                shape: Arc::new(Shape::default()),
            },
            CountryGeometry {
                name_long: "Germany".into(),
                shape: Arc::new(Shape::default()),
            },
        ];
        let joined = join_geometry(&records, &geometries);
        let spec = choropleth(&joined, Metric::Prevalence, 2000, Page::Styled);

        assert_eq!(spec.kind, ChartKind::Choropleth);
        let values: Vec<_> = spec.regions().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(15.0), None]);
        assert!(matches!(
            spec.color,
            Some(ColorEncoding::Continuous {
                scale: ColorScale::Blues,
                domain: Some((lo, hi)),
                ..
            }) if lo == 15.0 && hi == 15.0
        ));
    }

    #[test]
    fn choropleth_without_values_has_no_domain() {
        let geometries = vec![CountryGeometry {
            name_long: "Germany".into(),
            shape: Arc::new(Shape::default()),
        }];
        let joined = join_geometry(std::iter::empty(), &geometries);
        let spec = choropleth(&joined, Metric::Prevalence, 2000, Page::Vanilla);
        assert_eq!(spec.title, "Global TB Prevalence (2000)");
        assert!(matches!(
            spec.color,
            Some(ColorEncoding::Continuous {
                scale: ColorScale::Plasma,
                domain: None,
                ..
            })
        ));
    }
}
