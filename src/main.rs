mod app;
mod args;
mod chart;
mod color;
mod dashboard;
mod data;
mod map;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::TbDashboardApp;
use clap::Parser;
use eframe::egui;

use crate::args::CliArgs;
use crate::dashboard::Dashboard;
use crate::data::loader::{load_csv, load_geometry, GeometrySource};
use crate::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    // Both sources are loaded once, before the window opens.
    let dataset = load_csv(&args.data)
        .with_context(|| format!("loading burden data from {}", args.data.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;
    if dataset.is_empty() {
        log::warn!("{} has no data rows; every chart will be empty", args.data.display());
    }
    let source = GeometrySource::parse(&args.geometry);
    let world = load_geometry(&source)
        .with_context(|| format!("loading world geometry from {source}"))
        .inspect_err(|e| log::error!("{e:#}"))?;

    let dashboard = Dashboard::new(Arc::new(dataset), Arc::new(world));
    let state = AppState::new(dashboard, args.page.into());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Tuberculosis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TbDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the dashboard window: {e}"))
}
