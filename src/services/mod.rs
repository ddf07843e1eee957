//! Business logic services.

pub mod assessment;
pub mod export;
pub mod heatmap;
pub mod query;
pub mod scoring;
pub mod stats;
