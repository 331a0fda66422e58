use std::collections::BTreeSet;
use std::sync::Arc;

use crate::chart::builder::{self, TOP_N};
use crate::chart::{ChartSpec, Page};
use crate::data::filter::{
    filter_by_countries, filter_by_region, filter_by_year, join_geometry, top_n_by_field,
    unmatched_countries, FilterSelection,
};
use crate::data::model::{BurdenDataset, Metric, World};

// ---------------------------------------------------------------------------
// Dashboard – selection → query → chart pipeline
// ---------------------------------------------------------------------------

/// The five dashboard views over the shared, read-only data.
///
/// Cloning is cheap; the dataset and world are behind `Arc`.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<BurdenDataset>,
    world: Arc<World>,
}

/// All charts for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub country_trend: ChartSpec,
    pub prevalence_vs_mortality: ChartSpec,
    pub regional_incidence: ChartSpec,
    pub global_choropleth: ChartSpec,
    pub top10: ChartSpec,
}

impl Dashboard {
    pub fn new(dataset: Arc<BurdenDataset>, world: Arc<World>) -> Self {
        let unmatched = unmatched_countries(&dataset.records, &world);
        if !unmatched.is_empty() {
            log::warn!(
                "{} dataset countries have no geometry named after them and will not appear on the map: {}",
                unmatched.len(),
                unmatched.join(", ")
            );
        }
        Dashboard { dataset, world }
    }

    pub fn dataset(&self) -> &BurdenDataset {
        &self.dataset
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Prevalence over time, one line per selected country.
    pub fn country_trend(&self, countries: &BTreeSet<String>, page: Page) -> ChartSpec {
        let rows = filter_by_countries(&self.dataset.records, countries);
        builder::trend_line(&rows, Metric::Prevalence, page)
    }

    /// Prevalence against mortality for the selected countries.
    pub fn prevalence_vs_mortality(&self, countries: &BTreeSet<String>, page: Page) -> ChartSpec {
        let rows = filter_by_countries(&self.dataset.records, countries);
        builder::scatter(&rows, Metric::Prevalence, Metric::Mortality, page)
    }

    /// Incidence over time for one region.
    pub fn regional_incidence(&self, region: &str, page: Page) -> ChartSpec {
        let rows = filter_by_region(&self.dataset.records, region);
        builder::regional_trend(&rows, region, page)
    }

    /// World map of prevalence in one year.
    pub fn global_choropleth(&self, year: i32, page: Page) -> ChartSpec {
        let rows = filter_by_year(&self.dataset.records, year);
        let joined = join_geometry(rows, &self.world);
        builder::choropleth(&joined, Metric::Prevalence, year, page)
    }

    /// The ten countries with the highest prevalence in one year.
    pub fn top10(&self, year: i32, page: Page) -> ChartSpec {
        let rows = filter_by_year(&self.dataset.records, year);
        let top = top_n_by_field(rows, Metric::Prevalence, TOP_N, true);
        builder::top_bar(&top, Metric::Prevalence, year, page)
    }

    pub fn render_all(&self, selection: &FilterSelection, page: Page) -> ChartSet {
        ChartSet {
            country_trend: self.country_trend(&selection.countries, page),
            prevalence_vs_mortality: self.prevalence_vs_mortality(&selection.countries, page),
            regional_incidence: self.regional_incidence(&selection.region, page),
            global_choropleth: self.global_choropleth(selection.year, page),
            top10: self.top10(selection.year, page),
        }
    }
}
