//! Chart descriptions for a renderer.
//!
//! [`VisualizationGenerator`] turns a dataset and a column selection into a
//! [`VisualizationSpec`]: binned counts, category frequencies, a correlation
//! matrix, or grouped bivariate data. Nothing here draws pixels.
//!
//! # Example
//!
//! ```rust,ignore
//! use instant_eda::visualization::VisualizationGenerator;
//!
//! let chart = VisualizationGenerator::univariate(&dataset, "price", &config)?;
//! println!("{}", serde_json::to_string_pretty(&chart)?);
//! ```

mod generator;
mod specs;

pub use generator::VisualizationGenerator;
pub use specs::{
    CategoryCount, CategoryGroup, ClutterWarning, HistogramBin, PairCount, VisualizationSpec,
};
