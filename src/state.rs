use crate::chart::Page;
use crate::color::ColorMap;
use crate::dashboard::{ChartSet, Dashboard};
use crate::data::filter::FilterSelection;
use crate::map::{ChoroplethRaster, RegionIndex};

/// Horizontal resolution of the choropleth raster (pixels across 360°).
pub const MAP_RASTER_WIDTH: usize = 480;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    CountryTrends,
    RegionalTrends,
    GlobalOverview,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::CountryTrends, Tab::RegionalTrends, Tab::GlobalOverview];

    pub fn label(self) -> &'static str {
        match self {
            Tab::CountryTrends => "Country Trends",
            Tab::RegionalTrends => "Regional Trends",
            Tab::GlobalOverview => "Global Overview",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Each setter recomputes only the charts that depend on the changed input.
pub struct AppState {
    pub dashboard: Dashboard,
    pub selection: FilterSelection,
    pub page: Page,
    pub tab: Tab,

    /// Charts for the current selection and page (cached).
    pub charts: ChartSet,

    /// Colours of the country series currently shown.
    pub color_map: ColorMap,

    /// Pixel-to-shape lookup for the world, built once.
    map_index: RegionIndex,
    /// Raster of the current choropleth.
    pub map_raster: ChoroplethRaster,
    /// Bumped whenever `map_raster` or the map colours change.
    pub map_generation: u64,

    /// Text typed into the country search box.
    pub country_query: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard, page: Page) -> Self {
        let selection = FilterSelection::initial(dashboard.dataset());
        let charts = dashboard.render_all(&selection, page);
        let color_map = series_colors(&charts);
        let map_index = RegionIndex::build(
            dashboard.world().iter().map(|g| g.shape.as_ref()),
            MAP_RASTER_WIDTH,
        );
        let map_raster = map_index.paint(charts.global_choropleth.regions());

        AppState {
            dashboard,
            selection,
            page,
            tab: Tab::default(),
            charts,
            color_map,
            map_index,
            map_raster,
            map_generation: 0,
            country_query: String::new(),
        }
    }

    /// Switch page and rebuild every chart for it.
    pub fn set_page(&mut self, page: Page) {
        if self.page == page {
            return;
        }
        log::debug!("switching to {} page", page.label());
        self.page = page;
        self.charts = self.dashboard.render_all(&self.selection, page);
        self.color_map = series_colors(&self.charts);
        // Only the colour scale changed; the raster is reused.
        self.map_generation += 1;
    }

    /// Toggle a single country in the multi-select.
    pub fn toggle_country(&mut self, country: &str) {
        let countries = &mut self.selection.countries;
        if !countries.remove(country) {
            countries.insert(country.to_string());
        }
        self.refresh_country_charts();
    }

    pub fn clear_countries(&mut self) {
        self.selection.countries.clear();
        self.refresh_country_charts();
    }

    pub fn set_region(&mut self, region: &str) {
        if self.selection.region == region {
            return;
        }
        self.selection.region = region.to_string();
        self.charts.regional_incidence = self.dashboard.regional_incidence(region, self.page);
    }

    pub fn set_year(&mut self, year: i32) {
        if self.selection.year == year {
            return;
        }
        self.selection.year = year;
        self.charts.global_choropleth = self.dashboard.global_choropleth(year, self.page);
        self.charts.top10 = self.dashboard.top10(year, self.page);
        self.map_raster = self.map_index.paint(self.charts.global_choropleth.regions());
        self.map_generation += 1;
    }

    /// Countries matching the search box, in dataset order.
    pub fn matching_countries(&self) -> Vec<&str> {
        let query = self.country_query.trim().to_lowercase();
        self.dashboard
            .dataset()
            .countries
            .iter()
            .map(String::as_str)
            .filter(|c| query.is_empty() || c.to_lowercase().contains(&query))
            .collect()
    }

    /// Years labelled under the year slider: every year on the vanilla page,
    /// every fifth year on the styled page.
    pub fn year_marks(&self) -> Vec<i32> {
        let years = &self.dashboard.dataset().years;
        match self.page {
            Page::Vanilla => years.clone(),
            Page::Styled => years.iter().copied().filter(|y| y % 5 == 0).collect(),
        }
    }

    fn refresh_country_charts(&mut self) {
        let countries = &self.selection.countries;
        self.charts.country_trend = self.dashboard.country_trend(countries, self.page);
        self.charts.prevalence_vs_mortality =
            self.dashboard.prevalence_vs_mortality(countries, self.page);
        self.color_map = series_colors(&self.charts);
    }
}

/// Colours keyed by the country series of the trend chart, so both country
/// charts use the same colour per country.
fn series_colors(charts: &ChartSet) -> ColorMap {
    ColorMap::new(charts.country_trend.series().iter().map(|s| s.name.as_str()))
}
