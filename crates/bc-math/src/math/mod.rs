//! Core math modules.

pub mod descriptive;
pub mod error;
pub mod interval;
pub mod outliers;
pub mod quantile;
pub mod regression;
