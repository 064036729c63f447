//! Statistical sub-analyses over an event snapshot.
//!
//! Each analyzer is independent: it reads the snapshot (or the Poisson fit
//! derived from it) and returns a plain result value.

pub mod change_point;
pub mod goodness_of_fit;
pub mod poisson;
pub mod seasonal;
pub mod trend;

pub use change_point::{ChangePoint, ChangePointAnalysis, ChangePointDetector, DetectionMethod};
pub use goodness_of_fit::{ks_statistic, GoodnessOfFitResult, GoodnessOfFitTester};
pub use poisson::{
    exponential_quantile, interarrival_times, PercentileInterval, PoissonFit, PoissonProcessModel,
    SeasonalProfile, PERCENTILE_LEVELS,
};
pub use seasonal::{SeasonalAnalyzer, SeasonalPattern, SeasonalResult};
pub use trend::{TrendAnalyzer, TrendDirection, TrendResult};
