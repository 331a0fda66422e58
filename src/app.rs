use eframe::egui::{self, Ui};

use crate::chart::Page;
use crate::state::{AppState, Tab};
use crate::ui::plot::MapTexture;
use crate::ui::{panels, plot};

const CHART_HEIGHT: f32 = 480.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TbDashboardApp {
    pub state: AppState,
    map_texture: MapTexture,
}

impl TbDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            map_texture: None,
        }
    }
}

impl eframe::App for TbDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = match self.state.page {
            Page::Vanilla => egui::Visuals::dark(),
            Page::Styled => egui::Visuals::light(),
        };
        ctx.set_visuals(visuals);

        // ---- Top panel: page switch + heading ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection controls ----
        egui::SidePanel::left("selection_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.state.tab, tab, tab.label());
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match self.state.tab {
                    Tab::CountryTrends => self.country_tab(ui),
                    Tab::RegionalTrends => self.regional_tab(ui),
                    Tab::GlobalOverview => self.global_tab(ui),
                });
        });
    }
}

impl TbDashboardApp {
    fn country_tab(&mut self, ui: &mut Ui) {
        let state = &self.state;
        ui.columns(2, |cols| {
            panels::card(
                &mut cols[0],
                state.page,
                ("", "TB Prevalence Over Time"),
                |ui| plot::chart(ui, "trend", &state.charts.country_trend, &state.color_map, CHART_HEIGHT),
            );
            panels::card(
                &mut cols[1],
                state.page,
                ("", "Prevalence vs Mortality"),
                |ui| {
                    plot::chart(
                        ui,
                        "scatter",
                        &state.charts.prevalence_vs_mortality,
                        &state.color_map,
                        CHART_HEIGHT,
                    )
                },
            );
        });
    }

    fn regional_tab(&mut self, ui: &mut Ui) {
        let state = &self.state;
        panels::card(ui, state.page, ("", "TB Incidence by Region"), |ui| {
            plot::chart(
                ui,
                "regional",
                &state.charts.regional_incidence,
                &state.color_map,
                CHART_HEIGHT,
            )
        });
    }

    fn global_tab(&mut self, ui: &mut Ui) {
        let state = &self.state;
        let texture = &mut self.map_texture;
        ui.columns(2, |cols| {
            panels::card(
                &mut cols[0],
                state.page,
                ("", "Global TB Prevalence Map"),
                |ui| {
                    plot::choropleth(
                        ui,
                        &state.charts.global_choropleth,
                        &state.map_raster,
                        state.map_generation,
                        texture,
                        CHART_HEIGHT,
                    )
                },
            );
            panels::card(
                &mut cols[1],
                state.page,
                ("", "Top 10 Countries by Prevalence"),
                |ui| plot::chart(ui, "top10", &state.charts.top10, &state.color_map, CHART_HEIGHT),
            );
        });
    }
}
