// Health-trend summarization engine.
//
// Turns raw time series of sleep, HRV, resting-heart-rate, and training-load
// samples into trend classifications, consistency scores, correlations, and
// predictive risk flags across three time horizons. The data-access layer
// supplies newest-first sample collections; the resulting HealthSummary is
// handed to a downstream prose generator.

pub mod error;
pub mod logging;
pub mod models;
pub mod monthly;
pub mod predictive;
pub mod recent;
pub mod summary;
pub mod trends;
pub mod weekly;

// Re-export the public surface for convenience
pub use error::{AnalysisError, Result};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use models::{ActivitySample, SleepSample, UserProfile};
pub use monthly::{MonthlyAnalyzer, MonthlyPatterns};
pub use predictive::{PredictiveFlags, RiskLevel};
pub use recent::{EnergyPattern, RecentAnalyzer, RecentTrends, SleepTrend};
pub use summary::{summarize_health, HealthSummary};
pub use weekly::{TrainingProgression, WeeklyAnalyzer, WeeklyInsights};
