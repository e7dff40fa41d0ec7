//! Recent-window analysis: the last 1-3 nights and last 7 workouts.
//!
//! This is the short-horizon stage of the pipeline. It classifies the sleep
//! trend, summarizes the HRV pattern with threshold alerts, scores acute
//! training fatigue, and reads the overnight recovery markers.
//!
//! # Physiology notes
//!
//! - A falling HRV trend plus a rising resting heart rate is the classic
//!   early signature of accumulating stress, illness onset, or under-recovery.
//! - Absolute HRV below 20ms is low for almost any adult and warrants an
//!   alert regardless of trend.
//! - The fatigue score blends acute load with how far HRV/RHR sit from the
//!   window baseline; ratios above 2 can push it past 100 on purpose, and the
//!   predictive stage is tuned to the unclamped value.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{ActivitySample, SleepSample};
use crate::trends::{baseline, consistency_score, percent_trend};

/// Sleep samples considered by the recent window.
const SLEEP_WINDOW: usize = 3;
/// Activities considered by the recent window.
const ACTIVITY_WINDOW: usize = 7;

/// Direction of the short-horizon sleep-efficiency trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepTrend {
    Declining,
    Stable,
    Improving,
    NoData,
}

impl SleepTrend {
    /// Classify a percent-change value: beyond ±5% counts as movement.
    fn from_percent(change: f64) -> Self {
        if change > 5.0 {
            SleepTrend::Improving
        } else if change < -5.0 {
            SleepTrend::Declining
        } else {
            SleepTrend::Stable
        }
    }
}

impl fmt::Display for SleepTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SleepTrend::Declining => "declining",
            SleepTrend::Stable => "stable",
            SleepTrend::Improving => "improving",
            SleepTrend::NoData => "no_data",
        };
        write!(f, "{}", label)
    }
}

/// Day-to-day energy classification derived from readiness scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPattern {
    Consistent,
    Variable,
    Declining,
    Unknown,
}

impl fmt::Display for EnergyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnergyPattern::Consistent => "consistent",
            EnergyPattern::Variable => "variable",
            EnergyPattern::Declining => "declining",
            EnergyPattern::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// HRV summary over the recent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvPattern {
    /// Mean of the reported HRV values in the window (0 if none)
    pub avg: f64,

    /// Percent change oldest-to-newest across the window
    pub trend: f64,

    /// Threshold alerts, each independently evaluated
    pub alerts: Vec<String>,
}

/// Acute training load over the last 7 activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoad {
    /// Summed TSS over the window
    pub current: f64,

    /// Weekly average; at this granularity there is no separate baseline,
    /// so it intentionally equals `current`
    pub weekly_avg: f64,

    /// Blended 0-100-ish fatigue score (unclamped, may exceed 100)
    pub fatigue_score: u32,
}

/// Overnight recovery markers from the newest samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryMarkers {
    /// RHR delta, newest night minus the night before (bpm)
    pub rhr_change: f64,

    /// Latest skin-temperature deviation from baseline (°C)
    pub temp_deviation: f64,
}

/// Derived short-horizon trends; recomputed from scratch on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTrends {
    pub sleep_trend: SleepTrend,
    pub hrv_pattern: HrvPattern,
    pub training_load: TrainingLoad,
    pub recovery_markers: RecoveryMarkers,
    pub energy_pattern: EnergyPattern,
}

impl RecentTrends {
    /// Neutral structure returned when the user has no sleep history.
    /// A required branch, not a shortcut: the summarizer must never fail
    /// merely because data is sparse.
    pub fn no_data() -> Self {
        RecentTrends {
            sleep_trend: SleepTrend::NoData,
            hrv_pattern: HrvPattern {
                avg: 0.0,
                trend: 0.0,
                alerts: Vec::new(),
            },
            training_load: TrainingLoad {
                current: 0.0,
                weekly_avg: 0.0,
                fatigue_score: 0,
            },
            recovery_markers: RecoveryMarkers {
                rhr_change: 0.0,
                temp_deviation: 0.0,
            },
            energy_pattern: EnergyPattern::Unknown,
        }
    }
}

/// Analyzer for the most recent 3 sleep nights and 7 workouts.
pub struct RecentAnalyzer;

impl RecentAnalyzer {
    /// Derive [`RecentTrends`] from newest-first sample collections.
    pub fn analyze(sleep: &[SleepSample], activities: &[ActivitySample]) -> RecentTrends {
        if sleep.is_empty() {
            return RecentTrends::no_data();
        }

        let sleep = &sleep[..sleep.len().min(SLEEP_WINDOW)];
        let activities = &activities[..activities.len().min(ACTIVITY_WINDOW)];

        let efficiencies: Vec<f64> = sleep.iter().map(|s| s.sleep_efficiency).collect();
        let sleep_trend = SleepTrend::from_percent(percent_trend(&efficiencies));

        let hrv_values: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.hrv_avg)
            .filter(|v| *v > 0.0)
            .collect();
        let hrv_pattern = Self::hrv_pattern(&hrv_values);

        let rhr_values: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.resting_heart_rate)
            .filter(|v| *v > 0.0)
            .collect();

        let training_load = Self::training_load(activities, &hrv_values, &rhr_values);

        let recovery_markers = RecoveryMarkers {
            rhr_change: if rhr_values.len() >= 2 {
                rhr_values[0] - rhr_values[1]
            } else {
                0.0
            },
            temp_deviation: sleep[0].temperature_deviation.unwrap_or(0.0),
        };

        let readiness: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.readiness_score)
            .filter(|v| *v > 0.0)
            .collect();
        let energy_pattern = Self::energy_pattern(&readiness);

        debug!(
            ?sleep_trend,
            hrv_avg = hrv_pattern.avg,
            fatigue = training_load.fatigue_score,
            "recent window analyzed"
        );

        RecentTrends {
            sleep_trend,
            hrv_pattern,
            training_load,
            recovery_markers,
            energy_pattern,
        }
    }

    fn hrv_pattern(hrv_values: &[f64]) -> HrvPattern {
        let trend = percent_trend(hrv_values);
        let mut alerts = Vec::new();

        if trend < -15.0 {
            alerts.push("HRV declining rapidly - stress/fatigue warning".to_string());
        }
        if let Some(latest) = hrv_values.first() {
            if *latest < 20.0 {
                alerts.push("Very low HRV detected".to_string());
            }
        }

        HrvPattern {
            avg: baseline(hrv_values),
            trend,
            alerts,
        }
    }

    /// Blend acute load with HRV/RHR deviation from the window baseline.
    ///
    /// # Algorithm
    ///
    /// Mean of three sub-scores, rounded:
    /// - `min(100, total_tss / 5)`
    /// - `(latest_hrv / baseline_hrv) * 50`, 50 when no HRV available
    /// - `(baseline_rhr / latest_rhr) * 50`, 50 when no RHR available
    ///
    /// Deliberately unclamped above 100.
    fn training_load(
        activities: &[ActivitySample],
        hrv_values: &[f64],
        rhr_values: &[f64],
    ) -> TrainingLoad {
        let current: f64 = activities.iter().map(ActivitySample::tss).sum();

        let load_score = (current / 5.0).min(100.0);

        let hrv_score = match hrv_values.first() {
            Some(latest) => {
                let base = baseline(hrv_values);
                if base > 0.0 {
                    (latest / base) * 50.0
                } else {
                    50.0
                }
            }
            None => 50.0,
        };

        let rhr_score = match rhr_values.first() {
            Some(latest) if *latest > 0.0 => (baseline(rhr_values) / latest) * 50.0,
            _ => 50.0,
        };

        let fatigue_score = ((load_score + hrv_score + rhr_score) / 3.0).round() as u32;

        TrainingLoad {
            current,
            weekly_avg: current,
            fatigue_score,
        }
    }

    fn energy_pattern(readiness: &[f64]) -> EnergyPattern {
        if readiness.len() < 2 {
            return EnergyPattern::Consistent;
        }
        if percent_trend(readiness) < -10.0 {
            EnergyPattern::Declining
        } else if consistency_score(readiness) < 70.0 {
            EnergyPattern::Variable
        } else {
            EnergyPattern::Consistent
        }
    }
}
