//! Decision layer: interval bounds and recommendation fusion.

pub mod recommendation;
pub mod thresholds;

pub use recommendation::{
    Adjustments, Combined, CombinerInput, Recommendation, RecommendationCombiner,
    RecommendationMethod,
};
pub use thresholds::{AdaptiveThresholdCalculator, AdaptiveThresholds};
