use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::Page;
use crate::state::AppState;

/// Dashboard heading shown on both pages.
pub const TITLE: &str = "Global Tuberculosis Dashboard";

/// Accent colour of the styled page.
pub const STYLED_ACCENT: Color32 = Color32::from_rgb(0x2c, 0x3e, 0x50);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the page switch and the dataset summary.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        for page in Page::ALL {
            if ui.selectable_label(state.page == page, page.label()).clicked() {
                state.set_page(page);
            }
        }

        ui.separator();

        let ds = state.dashboard.dataset();
        ui.label(format!(
            "{} records, {} countries, {} map shapes",
            ds.len(),
            ds.countries.len(),
            state.dashboard.world().len()
        ));
    });

    let heading = RichText::new(TITLE).heading().strong();
    ui.vertical_centered(|ui: &mut Ui| match state.page {
        Page::Vanilla => {
            ui.label(heading);
        }
        Page::Styled => {
            ui.label(heading.color(STYLED_ACCENT).size(28.0).family(egui::FontFamily::Proportional));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – selection controls
// ---------------------------------------------------------------------------

/// Render the country, region and year controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let page = state.page;
            card(ui, page, ("Select Countries:", "Country Selection"), |ui| {
                country_picker(ui, state)
            });
            card(ui, page, ("Select Region:", "Region Selection"), |ui| {
                region_picker(ui, state)
            });
            card(ui, page, ("Select Year:", "Year Selection"), |ui| year_picker(ui, state));
        });
}

/// A titled group; framed like a card on the styled page.
///
/// `titles` holds the plain label for the vanilla page (may be empty) and the
/// card header for the styled page.
pub fn card(ui: &mut Ui, page: Page, titles: (&str, &str), add_contents: impl FnOnce(&mut Ui)) {
    let (label, header) = titles;
    match page {
        Page::Vanilla => {
            if !label.is_empty() {
                ui.label(label);
            }
            add_contents(ui);
            ui.add_space(8.0);
        }
        Page::Styled => {
            egui::Frame::group(ui.style())
                .fill(Color32::WHITE)
                .inner_margin(8.0)
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new(header).strong().color(STYLED_ACCENT));
                    ui.separator();
                    add_contents(ui);
                });
            ui.add_space(12.0);
        }
    }
}

fn country_picker(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.country_query)
                .hint_text("Search countries…")
                .desired_width(140.0),
        );
        if ui.small_button("None").clicked() {
            state.clear_countries();
        }
    });

    let n_selected = state.selection.countries.len();
    ui.weak(format!("{n_selected} selected"));

    // Clone what we need so we can mutate state inside the loop.
    let candidates: Vec<String> = state
        .matching_countries()
        .into_iter()
        .map(str::to_string)
        .collect();

    ScrollArea::vertical()
        .id_salt("country_list")
        .max_height(220.0)
        .show(ui, |ui: &mut Ui| {
            for country in &candidates {
                let mut checked = state.selection.countries.contains(country);
                let mut text = RichText::new(country);
                if checked {
                    text = text.color(state.color_map.color_for(country));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });
}

fn region_picker(ui: &mut Ui, state: &mut AppState) {
    let regions = state.dashboard.dataset().regions.clone();
    let current = state.selection.region.clone();
    egui::ComboBox::from_id_salt("region")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for region in &regions {
                if ui.selectable_label(current == *region, region).clicked() {
                    state.set_region(region);
                }
            }
        });
}

fn year_picker(ui: &mut Ui, state: &mut AppState) {
    let Some((min, max)) = state.dashboard.dataset().year_range() else {
        ui.weak("No years in dataset.");
        return;
    };

    let mut year = state.selection.year;
    let slider = egui::Slider::new(&mut year, min..=max).step_by(1.0).text("Year");
    if ui.add(slider).changed() {
        state.set_year(year);
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for mark in state.year_marks() {
            let label = RichText::new(mark.to_string()).small();
            if ui.selectable_label(state.selection.year == mark, label).clicked() {
                state.set_year(mark);
            }
        }
    });
}
