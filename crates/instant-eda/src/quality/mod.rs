//! Data quality analysis module.
//!
//! This module flags structurally risky columns ([`HealthAuditor`]) and
//! anomalous numeric values ([`OutlierDetector`]).

mod health;
mod outliers;

pub use health::HealthAuditor;
pub use outliers::{IqrFences, OutlierDetector, iqr_fences};
