//! Pipeline entry point: compose the three analysis windows and the
//! predictive flags into one [`HealthSummary`].
//!
//! The summary is the hand-off value for the downstream prose generator. It
//! owns all of its data and holds no reference back to the raw samples; two
//! calls with identical inputs produce identical output (no clock access
//! happens inside the pipeline — "today" lives in the caller's data
//! selection).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ActivitySample, SleepSample, UserProfile};
use crate::monthly::{MonthlyAnalyzer, MonthlyPatterns};
use crate::predictive::PredictiveFlags;
use crate::recent::{RecentAnalyzer, RecentTrends};
use crate::weekly::{WeeklyAnalyzer, WeeklyInsights};

/// Hard cap on the monthly analysis window, in samples.
const MONTHLY_WINDOW_MAX: usize = 30;

/// Aggregate result of one summarization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub user_profile: UserProfile,
    pub recent: RecentTrends,
    pub weekly: WeeklyInsights,
    pub monthly: MonthlyPatterns,
    pub predictive_flags: PredictiveFlags,
}

impl HealthSummary {
    /// Serialize for the JSON-speaking prose generator.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Run the full analysis pipeline over one user's history.
///
/// Both collections must be sorted newest-first; the caller also performs
/// any coarse lookback filtering. `lookback_days` caps how many daily sleep
/// samples the monthly analyzer sees (at most 30). It does not slice the
/// activity collection: activities arrive pre-filtered to the lookback
/// window, and whatever is passed flows to every analyzer unchanged.
///
/// The weekly and monthly analyzers are independent of each other and of the
/// recent window, so they run on a rayon join; the predictive synthesizer
/// then combines the joined results. Sparse or empty input never fails —
/// every stage degrades to its documented neutral defaults.
pub fn summarize_health(
    profile: &UserProfile,
    sleep: &[SleepSample],
    activities: &[ActivitySample],
    lookback_days: usize,
) -> HealthSummary {
    let monthly_window = lookback_days.min(MONTHLY_WINDOW_MAX).min(sleep.len());

    let recent = RecentAnalyzer::analyze(sleep, activities);
    let (weekly, monthly) = rayon::join(
        || WeeklyAnalyzer::analyze(sleep, activities),
        || MonthlyAnalyzer::analyze(&sleep[..monthly_window], activities),
    );
    let predictive_flags = PredictiveFlags::synthesize(&recent, &weekly);

    debug!(
        sleep_samples = sleep.len(),
        activity_samples = activities.len(),
        lookback_days,
        "health summary produced"
    );

    HealthSummary {
        user_profile: profile.clone(),
        recent,
        weekly,
        monthly,
        predictive_flags,
    }
}
