//! Choropleth rasterization on an equirectangular lon/lat grid.

pub mod raster;

pub use raster::{outlines, region_at, Cell, ChoroplethRaster, RegionIndex};
