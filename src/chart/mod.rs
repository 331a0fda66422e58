//! Chart descriptions built from filtered burden data.
//!
//! Builders are pure: they read borrowed rows and return an owned
//! [`ChartSpec`] that the UI draws without touching the dataset again.

pub mod builder;
pub mod spec;

pub use builder::Page;
pub use spec::ChartSpec;
