//! Monthly pattern analysis: up to 30 days of sleep and training history.
//!
//! The long horizon looks past day-to-day noise for structural patterns:
//! shifts in sleep need, training-block vs recovery-week cadence, slow
//! drifts in the HRV/RHR baselines, and lifestyle habits (bedtime routine,
//! weekend catch-up sleep, time-of-day workout preference).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ActivitySample, SleepSample};
use crate::trends::{baseline, consistency_score, correlation_pairs, long_term_slope};

/// Maximum sleep samples the monthly window considers.
const SLEEP_WINDOW: usize = 30;
/// Slice length for the newest-vs-oldest sleep-duration comparison.
const SEASONAL_SLICE: usize = 10;
/// Minimum paired points for the monthly correlations.
const CORRELATION_MIN_POINTS: usize = 7;

/// Weekly training-block vs recovery-phase counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationCycles {
    /// Calendar weeks with ≥4 sessions or weekly TSS > 200
    pub training_blocks: u32,

    /// Calendar weeks with ≤2 sessions and weekly TSS < 100
    pub recovery_phases: u32,
}

/// Cross-metric Pearson correlations over the monthly window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCorrelations {
    /// Sleep efficiency vs same-day training load, in [-1, 1]
    pub sleep_training: f64,

    /// HRV vs negated RHR, in [-1, 1]; positive means the two recovery
    /// markers move together
    pub stress_recovery: f64,
}

/// Long-term OLS slopes of the recovery baselines, per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineShifts {
    pub hrv_trend: f64,
    pub rhr_trend: f64,
}

/// Derived monthly patterns; recomputed from scratch on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPatterns {
    pub seasonal_trends: Vec<String>,
    pub adaptation_cycles: AdaptationCycles,
    pub health_correlations: HealthCorrelations,
    pub baseline_shifts: BaselineShifts,
    pub lifestyle_patterns: Vec<String>,
}

/// Analyzer for the trailing ~30 day window.
pub struct MonthlyAnalyzer;

impl MonthlyAnalyzer {
    /// Derive [`MonthlyPatterns`] from newest-first sample collections.
    pub fn analyze(sleep: &[SleepSample], activities: &[ActivitySample]) -> MonthlyPatterns {
        let sleep = &sleep[..sleep.len().min(SLEEP_WINDOW)];

        let hrv_values: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.hrv_avg)
            .filter(|v| *v > 0.0)
            .collect();
        let rhr_values: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.resting_heart_rate)
            .filter(|v| *v > 0.0)
            .collect();

        let patterns = MonthlyPatterns {
            seasonal_trends: Self::seasonal_trends(sleep, activities),
            adaptation_cycles: Self::adaptation_cycles(activities),
            health_correlations: Self::health_correlations(sleep, activities),
            baseline_shifts: BaselineShifts {
                hrv_trend: long_term_slope(&hrv_values),
                rhr_trend: long_term_slope(&rhr_values),
            },
            lifestyle_patterns: Self::lifestyle_patterns(sleep, activities),
        };

        debug!(
            training_blocks = patterns.adaptation_cycles.training_blocks,
            recovery_phases = patterns.adaptation_cycles.recovery_phases,
            hrv_slope = patterns.baseline_shifts.hrv_trend,
            "monthly window analyzed"
        );

        patterns
    }

    /// Sleep-need shifts and coarse activity habits.
    fn seasonal_trends(sleep: &[SleepSample], activities: &[ActivitySample]) -> Vec<String> {
        let mut trends = Vec::new();

        let durations: Vec<f64> = sleep.iter().map(|s| s.total_sleep_minutes).collect();
        if durations.len() >= 2 {
            let slice = durations.len().min(SEASONAL_SLICE);
            let newest = baseline(&durations[..slice]);
            let oldest = baseline(&durations[durations.len() - slice..]);
            let shift = newest - oldest;
            if shift > 30.0 {
                trends.push("Increased sleep need - higher recovery demand".to_string());
            } else if shift < -30.0 {
                trends.push("Reduced sleep duration trend".to_string());
            }
        }

        if !activities.is_empty() {
            let weekend_sessions = activities
                .iter()
                .filter(|a| is_weekend(a.date().weekday()))
                .count();
            if weekend_sessions as f64 / activities.len() as f64 > 0.4 {
                trends.push("Weekend warrior pattern".to_string());
            }

            let avg_minutes = activities
                .iter()
                .map(|a| a.duration_seconds as f64 / 60.0)
                .sum::<f64>()
                / activities.len() as f64;
            if avg_minutes < 40.0 {
                trends.push("Short indoor session preference".to_string());
            }
        }

        if trends.is_empty() {
            trends.push("Consistent activity patterns".to_string());
        }
        trends
    }

    /// Group activities into Sunday-start calendar weeks and classify each
    /// week as a training block, a recovery phase, or neither.
    fn adaptation_cycles(activities: &[ActivitySample]) -> AdaptationCycles {
        let mut weeks: BTreeMap<NaiveDate, (u32, f64)> = BTreeMap::new();
        for activity in activities {
            let week_start = activity.date().week(Weekday::Sun).first_day();
            let entry = weeks.entry(week_start).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += activity.tss();
        }

        let mut cycles = AdaptationCycles {
            training_blocks: 0,
            recovery_phases: 0,
        };
        for (sessions, tss) in weeks.values() {
            if *sessions >= 4 || *tss > 200.0 {
                cycles.training_blocks += 1;
            } else if *sessions <= 2 && *tss < 100.0 {
                cycles.recovery_phases += 1;
            }
        }
        cycles
    }

    fn health_correlations(
        sleep: &[SleepSample],
        activities: &[ActivitySample],
    ) -> HealthCorrelations {
        // Sum TSS per calendar day once; sleep days with no training count as 0
        let mut daily_tss: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for activity in activities {
            *daily_tss.entry(activity.date()).or_insert(0.0) += activity.tss();
        }

        let sleep_training_pairs: Vec<(f64, f64)> = sleep
            .iter()
            .map(|s| {
                (
                    s.sleep_efficiency,
                    daily_tss.get(&s.date).copied().unwrap_or(0.0),
                )
            })
            .collect();

        let stress_recovery_pairs: Vec<(f64, f64)> = sleep
            .iter()
            .filter_map(|s| match (s.hrv_avg, s.resting_heart_rate) {
                (Some(hrv), Some(rhr)) if hrv > 0.0 && rhr > 0.0 => Some((hrv, -rhr)),
                _ => None,
            })
            .collect();

        HealthCorrelations {
            sleep_training: if sleep_training_pairs.len() >= CORRELATION_MIN_POINTS {
                correlation_pairs(sleep_training_pairs.into_iter())
            } else {
                0.0
            },
            stress_recovery: if stress_recovery_pairs.len() >= CORRELATION_MIN_POINTS {
                correlation_pairs(stress_recovery_pairs.into_iter())
            } else {
                0.0
            },
        }
    }

    fn lifestyle_patterns(sleep: &[SleepSample], activities: &[ActivitySample]) -> Vec<String> {
        let mut patterns = Vec::new();

        // Bedtime regularity, as decimal hour of day
        let bedtimes: Vec<f64> = sleep
            .iter()
            .filter_map(|s| s.bedtime_start)
            .map(|t| t.hour() as f64 + t.minute() as f64 / 60.0)
            .collect();
        if bedtimes.len() >= 5 {
            let score = consistency_score(&bedtimes);
            if score > 80.0 {
                patterns.push("Consistent bedtime routine".to_string());
            } else if score < 60.0 {
                patterns.push("Variable sleep schedule".to_string());
            }
        }

        // Weekend catch-up sleep
        let (weekend, weekday): (Vec<&SleepSample>, Vec<&SleepSample>) =
            sleep.iter().partition(|s| is_weekend(s.date.weekday()));
        if !weekend.is_empty() && !weekday.is_empty() {
            let weekend_mean =
                baseline(&weekend.iter().map(|s| s.total_sleep_minutes).collect::<Vec<_>>());
            let weekday_mean =
                baseline(&weekday.iter().map(|s| s.total_sleep_minutes).collect::<Vec<_>>());
            if weekend_mean - weekday_mean > 60.0 {
                patterns.push("Weekend sleep catch-up pattern".to_string());
            }
        }

        // Time-of-day workout preference
        let morning = activities
            .iter()
            .filter(|a| (5..12).contains(&a.start_time.hour()))
            .count() as f64;
        let evening = activities
            .iter()
            .filter(|a| (17..22).contains(&a.start_time.hour()))
            .count() as f64;
        if morning > evening * 1.5 && morning > 0.0 {
            patterns.push("Morning workout preference".to_string());
        } else if evening > morning * 1.5 && evening > 0.0 {
            patterns.push("Evening workout preference".to_string());
        }

        // Exercise-day density over the elapsed span
        if let (Some(newest), Some(oldest)) = (activities.first(), activities.last()) {
            let elapsed_days = (newest.date() - oldest.date()).num_days() + 1;
            let workout_days = activities
                .iter()
                .map(ActivitySample::date)
                .collect::<std::collections::BTreeSet<_>>()
                .len();
            if elapsed_days > 0 && workout_days as f64 / elapsed_days as f64 > 0.5 {
                patterns.push("High exercise consistency".to_string());
            }
        }

        if patterns.is_empty() {
            patterns.push("Developing routine".to_string());
        }
        patterns
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}
