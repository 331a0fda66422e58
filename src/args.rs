use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::chart::Page;
use crate::data::loader::DEFAULT_GEOMETRY_URL;

/// Command-line arguments for the dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "tb-dashboard",
    version,
    about = "Interactive dashboard of country-level tuberculosis burden estimates"
)]
pub struct CliArgs {
    /// Path to the TB burden CSV
    #[arg(short = 'd', long = "data", default_value = "data/TB_Burden_Country.csv")]
    pub data: PathBuf,

    /// World geometry GeoJSON: an http(s) URL or a local file path
    #[arg(short = 'g', long = "geometry", default_value = DEFAULT_GEOMETRY_URL)]
    pub geometry: String,

    /// Page shown at startup
    #[arg(short = 'p', long = "page", value_enum, default_value_t = PageArg::Vanilla)]
    pub page: PageArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    Vanilla,
    Styled,
}

impl From<PageArg> for Page {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::Vanilla => Page::Vanilla,
            PageArg::Styled => Page::Styled,
        }
    }
}
