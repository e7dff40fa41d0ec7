//! Predictive risk and opportunity flags.
//!
//! Deterministic weighted-factor counting over the recent and weekly
//! analyses — not a trained model. Each factor is an independent boolean;
//! the count maps onto a categorical level. The thresholds reproduce the
//! reference briefing behavior exactly and are not user-tunable.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::recent::{EnergyPattern, RecentTrends, SleepTrend};
use crate::weekly::{TrainingProgression, WeeklyInsights};

/// Categorical risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// Synthesized risk/opportunity flags for the briefing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveFlags {
    pub illness_risk: RiskLevel,
    pub overtraining_risk: RiskLevel,

    /// Human-readable window when conditions favor a peak effort, or None
    pub peak_performance_window: Option<String>,
}

impl PredictiveFlags {
    /// Combine the short- and mid-horizon analyses into categorical flags.
    pub fn synthesize(recent: &RecentTrends, weekly: &WeeklyInsights) -> Self {
        let flags = PredictiveFlags {
            illness_risk: Self::illness_risk(recent, weekly),
            overtraining_risk: Self::overtraining_risk(recent, weekly),
            peak_performance_window: Self::peak_performance_window(recent, weekly),
        };
        debug!(
            illness = %flags.illness_risk,
            overtraining = %flags.overtraining_risk,
            peak = ?flags.peak_performance_window,
            "predictive flags synthesized"
        );
        flags
    }

    /// Elevated RHR, raised skin temperature, crashing HRV, worsening sleep,
    /// and repeated poor-HRV nights each add one factor.
    /// 3+ factors: high, 2: moderate, else low.
    fn illness_risk(recent: &RecentTrends, weekly: &WeeklyInsights) -> RiskLevel {
        let factors = [
            recent.recovery_markers.rhr_change > 5.0,
            recent.recovery_markers.temp_deviation > 0.5,
            recent.hrv_pattern.trend < -20.0,
            recent.sleep_trend == SleepTrend::Declining,
            weekly.stress_indicators.poor_hrv_days >= 3,
        ];
        match count(&factors) {
            n if n >= 3 => RiskLevel::High,
            2 => RiskLevel::Moderate,
            _ => RiskLevel::Low,
        }
    }

    /// High fatigue, sustained stress markers, declining energy, an
    /// overreaching week, and an acute-load spike each add one factor.
    /// 4+ factors: high, 2-3: moderate, else low.
    fn overtraining_risk(recent: &RecentTrends, weekly: &WeeklyInsights) -> RiskLevel {
        let factors = [
            recent.training_load.fatigue_score > 70,
            weekly.stress_indicators.poor_hrv_days >= 4,
            weekly.stress_indicators.elevated_rhr_days >= 3,
            recent.energy_pattern == EnergyPattern::Declining,
            weekly.training_progression == TrainingProgression::Overreaching,
            recent.training_load.current > 1.3 * recent.training_load.weekly_avg,
        ];
        match count(&factors) {
            n if n >= 4 => RiskLevel::High,
            n if n >= 2 => RiskLevel::Moderate,
            _ => RiskLevel::Low,
        }
    }

    /// Rising HRV, low fatigue, improving sleep, steady energy, a building
    /// week, and a settled RHR each add one factor. The more factors align,
    /// the nearer the predicted window.
    fn peak_performance_window(recent: &RecentTrends, weekly: &WeeklyInsights) -> Option<String> {
        let factors = [
            recent.hrv_pattern.trend > 10.0,
            recent.training_load.fatigue_score < 40,
            recent.sleep_trend == SleepTrend::Improving,
            recent.energy_pattern == EnergyPattern::Consistent,
            weekly.training_progression == TrainingProgression::Building,
            recent.recovery_markers.rhr_change < 2.0,
        ];
        match count(&factors) {
            n if n >= 5 => Some("next 2-3 days (optimal conditions)".to_string()),
            4 => Some("next 3-5 days".to_string()),
            3 => Some("next 5-7 days".to_string()),
            _ => None,
        }
    }
}

fn count(factors: &[bool]) -> usize {
    factors.iter().filter(|f| **f).count()
}
