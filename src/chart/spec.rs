use std::sync::Arc;

use crate::data::model::{Metric, Shape};

// ---------------------------------------------------------------------------
// Field bindings and encodings
// ---------------------------------------------------------------------------

/// What kind of chart a [`ChartSpec`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Scatter,
    Bar,
    Choropleth,
}

/// A dataset column bound to an axis or a color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Country,
    Metric(Metric),
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Country => "Country",
            Field::Metric(m) => m.label(),
        }
    }
}

/// Named continuous color scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// White to dark blue.
    Blues,
    /// Dark purple through magenta to yellow.
    Plasma,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorEncoding {
    /// One distinct color per value of the field.
    Categorical(Field),
    /// Values of the field mapped onto a scale over `domain`.
    /// `domain` is `None` when the chart holds no values.
    Continuous {
        field: Field,
        scale: ColorScale,
        domain: Option<(f64, f64)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

/// A named sequence of `[x, y]` points (one line, or one scatter group).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// One bar of a categorical bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    /// `None` keeps the category on the axis with no bar drawn.
    pub value: Option<f64>,
}

/// One shaded area of a choropleth.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub shape: Arc<Shape>,
    /// `None` renders in the neutral no-data shade.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Marks {
    Series(Vec<Series>),
    Bars(Vec<Bar>),
    Regions(Vec<Region>),
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

/// A declarative description of one chart, independent of any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Field,
    pub y: Field,
    pub color: Option<ColorEncoding>,
    pub orientation: Orientation,
    pub show_legend: bool,
    pub marks: Marks,
}

impl ChartSpec {
    pub fn series(&self) -> &[Series] {
        match &self.marks {
            Marks::Series(s) => s,
            _ => &[],
        }
    }

    pub fn bars(&self) -> &[Bar] {
        match &self.marks {
            Marks::Bars(b) => b,
            _ => &[],
        }
    }

    pub fn regions(&self) -> &[Region] {
        match &self.marks {
            Marks::Regions(r) => r,
            _ => &[],
        }
    }

    /// Whether the chart has nothing to draw.
    pub fn is_blank(&self) -> bool {
        match &self.marks {
            Marks::Series(s) => s.iter().all(|s| s.points.is_empty()),
            Marks::Bars(b) => b.is_empty(),
            Marks::Regions(r) => r.is_empty(),
        }
    }
}
