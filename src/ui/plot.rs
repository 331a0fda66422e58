use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, ColorImage, RichText, TextureHandle, TextureOptions, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotImage, PlotPoint, PlotPoints, Points,
};

use crate::chart::spec::{ChartKind, ChartSpec, ColorEncoding, ColorScale, Orientation};
use crate::color::{ColorMap, NO_DATA};
use crate::map::{outlines, region_at, Cell, ChoroplethRaster};

/// Choropleth texture tagged with the raster generation it was built from.
pub type MapTexture = Option<(u64, TextureHandle)>;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Draw `spec` with a plot widget `height` points tall.
///
/// Choropleths are drawn by [`choropleth`] instead, since they need the raster.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec, colors: &ColorMap, height: f32) {
    if !spec.title.is_empty() {
        ui.label(RichText::new(&spec.title).strong());
    }
    if spec.is_blank() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.weak("No data for this selection");
            });
        });
        return;
    }

    match spec.kind {
        ChartKind::Line | ChartKind::Scatter => series_plot(ui, id, spec, colors, height),
        ChartKind::Bar => bar_plot(ui, id, spec, height),
        ChartKind::Choropleth => {
            log::warn!("choropleth '{id}' passed to chart(); use choropleth()");
        }
    }
}

/// Plot with axis labels, interaction and legend taken from `spec`.
fn base_plot<'a>(id: &str, spec: &ChartSpec, height: f32) -> Plot<'a> {
    let plot = Plot::new(id)
        .height(height)
        .x_axis_label(spec.x.label())
        .y_axis_label(spec.y.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if spec.show_legend {
        plot.legend(Legend::default())
    } else {
        plot
    }
}

fn series_plot(ui: &mut Ui, id: &str, spec: &ChartSpec, colors: &ColorMap, height: f32) {
    let categorical = matches!(spec.color, Some(ColorEncoding::Categorical(_)));

    base_plot(id, spec, height).show(ui, |plot_ui| {
        for series in spec.series() {
            let color = if categorical {
                colors.color_for(&series.name)
            } else {
                Color32::LIGHT_BLUE
            };
            let points = PlotPoints::from(series.points.clone());

            match spec.kind {
                ChartKind::Scatter => plot_ui.points(
                    Points::new(points)
                        .name(&series.name)
                        .color(color)
                        .radius(3.0),
                ),
                _ => plot_ui.line(Line::new(points).name(&series.name).color(color).width(1.5)),
            }
        }
    });
}

fn bar_plot(ui: &mut Ui, id: &str, spec: &ChartSpec, height: f32) {
    let bars = spec.bars();
    let n = bars.len();
    let orientation = spec.orientation;
    let horizontal = orientation == Orientation::Horizontal;
    // Horizontal charts list the first bar at the top.
    let position = move |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };

    let continuous = match spec.color {
        Some(ColorEncoding::Continuous {
            scale,
            domain: Some(domain),
            ..
        }) => Some((scale, domain)),
        _ => None,
    };

    // Missing values keep their slot with a zero-length bar.
    let plot_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let fill = match (b.value, continuous) {
                (Some(v), Some((scale, domain))) => scale.color_for(v, domain),
                _ => Color32::from_rgb(0x63, 0x6e, 0xfa),
            };
            Bar::new(position(i), b.value.unwrap_or(0.0))
                .name(&b.category)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    let categories: Vec<String> = bars.iter().map(|b| b.category.clone()).collect();
    let category_label = move |mark: GridMark, _range: &RangeInclusive<f64>| {
        category_at(&categories, mark.value, orientation)
    };

    let plot = base_plot(id, spec, height);
    let plot = if horizontal {
        plot.y_axis_formatter(category_label)
    } else {
        plot.x_axis_formatter(category_label)
    };
    plot.show(ui, |plot_ui| {
        let value_field = if horizontal { spec.x } else { spec.y };
        let chart = BarChart::new(plot_bars).name(value_field.label());
        let chart = if horizontal { chart.horizontal() } else { chart };
        plot_ui.bar_chart(chart);
    });
}

/// Category label for an axis tick at `value`, empty between slots.
fn category_at(categories: &[String], value: f64, orientation: Orientation) -> String {
    let n = categories.len();
    let slot = value.round();
    if (value - slot).abs() > 1e-6 || slot < 0.0 || slot as usize >= n {
        return String::new();
    }
    let slot = slot as usize;
    match orientation {
        Orientation::Horizontal => categories[n - 1 - slot].clone(),
        Orientation::Vertical => categories[slot].clone(),
    }
}

// ---------------------------------------------------------------------------
// Choropleth
// ---------------------------------------------------------------------------

/// Draw the choropleth raster with country outlines on top.
pub fn choropleth(
    ui: &mut Ui,
    spec: &ChartSpec,
    raster: &ChoroplethRaster,
    generation: u64,
    texture: &mut MapTexture,
    height: f32,
) {
    if !spec.title.is_empty() {
        ui.label(RichText::new(&spec.title).strong());
    }

    let (scale, domain) = match spec.color {
        Some(ColorEncoding::Continuous { scale, domain, .. }) => (scale, domain),
        _ => (ColorScale::Blues, None),
    };

    let stale = texture.as_ref().map(|(gen, _)| *gen != generation).unwrap_or(true);
    if stale {
        let image = raster_image(raster, scale, domain);
        let handle = ui
            .ctx()
            .load_texture("choropleth", image, TextureOptions::NEAREST);
        *texture = Some((generation, handle));
    }
    let Some((_, handle)) = texture.as_ref() else {
        return;
    };

    let rings = outlines(spec.regions());
    let pointer = Plot::new("choropleth")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(
                handle.id(),
                PlotPoint::new(0.0, 0.0),
                egui::vec2(360.0, 180.0),
            ));
            for ring in rings {
                plot_ui.line(
                    Line::new(PlotPoints::from(ring.to_vec()))
                        .color(Color32::from_gray(120))
                        .width(0.5),
                );
            }
            plot_ui.pointer_coordinate()
        })
        .inner;

    color_legend(ui, spec, scale, domain);

    if let Some(region) = pointer.and_then(|p| region_at(spec.regions(), p.x, p.y)) {
        let value = match region.value {
            Some(v) => format!("{v:.1}"),
            None => "no data".to_string(),
        };
        ui.label(format!("{}: {value}", region.name));
    }
}

fn color_legend(ui: &mut Ui, spec: &ChartSpec, scale: ColorScale, domain: Option<(f64, f64)>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(spec.y.label());
        match domain {
            Some((lo, hi)) => {
                ui.label(format!("{lo:.0}"));
                for step in 0..=10 {
                    swatch(ui, scale.sample(step as f64 / 10.0));
                }
                ui.label(format!("{hi:.0}"));
            }
            None => {
                ui.weak("no values for this year");
            }
        }
        swatch(ui, NO_DATA);
        ui.weak("no data");
    });
}

fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

/// Convert raster cells into texture pixels.
pub fn raster_image(
    raster: &ChoroplethRaster,
    scale: ColorScale,
    domain: Option<(f64, f64)>,
) -> ColorImage {
    let mut image = ColorImage::new([raster.width, raster.height], Color32::TRANSPARENT);
    for (pixel, cell) in image.pixels.iter_mut().zip(&raster.cells) {
        *pixel = match (*cell, domain) {
            (Cell::Empty, _) => Color32::TRANSPARENT,
            (Cell::NoData, _) | (Cell::Value(_), None) => NO_DATA,
            (Cell::Value(v), Some(domain)) => scale.color_for(v, domain),
        };
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_image_colors_each_cell_kind() {
        let raster = ChoroplethRaster {
            width: 2,
            height: 2,
            cells: vec![Cell::Empty, Cell::NoData, Cell::Value(0.0), Cell::Value(10.0)],
        };
        let image = raster_image(&raster, ColorScale::Blues, Some((0.0, 10.0)));
        assert_eq!(image.size, [2, 2]);
        assert_eq!(image.pixels[0], Color32::TRANSPARENT);
        assert_eq!(image.pixels[1], NO_DATA);
        assert_eq!(image.pixels[2], ColorScale::Blues.sample(0.0));
        assert_eq!(image.pixels[3], ColorScale::Blues.sample(1.0));

        let blank = raster_image(&raster, ColorScale::Blues, None);
        assert_eq!(blank.pixels[3], NO_DATA);
    }

    #[test]
    fn category_ticks_follow_orientation() {
        let categories: Vec<String> = ["India", "Cambodia", "Peru"].map(String::from).into();
        assert_eq!(category_at(&categories, 0.0, Orientation::Horizontal), "Peru");
        assert_eq!(category_at(&categories, 2.0, Orientation::Horizontal), "India");
        assert_eq!(category_at(&categories, 0.0, Orientation::Vertical), "India");
        assert_eq!(category_at(&categories, 0.5, Orientation::Vertical), "");
        assert_eq!(category_at(&categories, 3.0, Orientation::Vertical), "");
        assert_eq!(category_at(&categories, -1.0, Orientation::Horizontal), "");
    }
}
