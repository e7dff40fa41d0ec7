//! Weekly insight analysis: the last 7 nights and last 14 workouts.
//!
//! Classifies the training progression from volume and frequency, counts
//! stress-indicator days against the personal baseline, and looks for early
//! adaptation signals in the HRV series.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{ActivitySample, SleepSample};
use crate::trends::{baseline, consistency_score};

/// Sleep samples considered by the weekly window.
const SLEEP_WINDOW: usize = 7;
/// Activities considered by the weekly window.
const ACTIVITY_WINDOW: usize = 14;

/// Training progression classification.
///
/// The cutoffs are fixed policy constants tuned against the reference
/// briefing behavior, not per-user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingProgression {
    Building,
    Maintaining,
    Recovering,
    Overreaching,
}

impl TrainingProgression {
    /// Classify weekly volume and frequency.
    ///
    /// - TSS > 400 and > 6 sessions: overreaching
    /// - TSS > 200 and ≥ 4 sessions: building
    /// - ≤ 2 sessions: recovering
    /// - otherwise: maintaining
    pub fn from_load(weekly_tss: f64, session_count: usize) -> Self {
        if weekly_tss > 400.0 && session_count > 6 {
            TrainingProgression::Overreaching
        } else if weekly_tss > 200.0 && session_count >= 4 {
            TrainingProgression::Building
        } else if session_count <= 2 {
            TrainingProgression::Recovering
        } else {
            TrainingProgression::Maintaining
        }
    }
}

impl fmt::Display for TrainingProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrainingProgression::Building => "building",
            TrainingProgression::Maintaining => "maintaining",
            TrainingProgression::Recovering => "recovering",
            TrainingProgression::Overreaching => "overreaching",
        };
        write!(f, "{}", label)
    }
}

/// Day counts of physiological stress markers over the sleep window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressIndicators {
    /// Nights with RHR more than 5% above the window baseline
    pub elevated_rhr_days: u32,

    /// Nights with HRV more than 10% below the window baseline
    pub poor_hrv_days: u32,
}

/// Session-quality markers over the activity window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMarkers {
    /// Sessions with TSS above 50
    pub quality_sessions: u32,

    /// `7 - session_count`; goes negative when the 14-activity window holds
    /// more than 7 sessions. Accepted quirk, kept unclamped.
    pub recovery_days: i32,
}

/// Derived weekly insights; recomputed from scratch on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyInsights {
    /// Consistency score over nightly sleep duration (0-100)
    pub sleep_consistency: f64,
    pub training_progression: TrainingProgression,
    pub stress_indicators: StressIndicators,
    pub performance_markers: PerformanceMarkers,
    pub adaptation_signals: Vec<String>,
}

/// Analyzer for the most recent 7 nights and 14 workouts.
pub struct WeeklyAnalyzer;

impl WeeklyAnalyzer {
    /// Derive [`WeeklyInsights`] from newest-first sample collections.
    pub fn analyze(sleep: &[SleepSample], activities: &[ActivitySample]) -> WeeklyInsights {
        let sleep = &sleep[..sleep.len().min(SLEEP_WINDOW)];
        let activities = &activities[..activities.len().min(ACTIVITY_WINDOW)];

        let durations: Vec<f64> = sleep.iter().map(|s| s.total_sleep_minutes).collect();
        let sleep_consistency = consistency_score(&durations);

        let weekly_tss: f64 = activities.iter().map(ActivitySample::tss).sum();
        let session_count = activities.len();
        let training_progression = TrainingProgression::from_load(weekly_tss, session_count);

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

        let hrv_baseline = baseline(&hrv_values);
        let rhr_baseline = baseline(&rhr_values);
        let stress_indicators = StressIndicators {
            poor_hrv_days: hrv_values.iter().filter(|v| **v < hrv_baseline * 0.9).count() as u32,
            elevated_rhr_days: rhr_values
                .iter()
                .filter(|v| **v > rhr_baseline * 1.05)
                .count() as u32,
        };

        let performance_markers = PerformanceMarkers {
            quality_sessions: activities.iter().filter(|a| a.tss() > 50.0).count() as u32,
            recovery_days: 7 - session_count as i32,
        };

        let adaptation_signals = Self::adaptation_signals(&hrv_values);

        debug!(
            ?training_progression,
            weekly_tss,
            session_count,
            sleep_consistency,
            "weekly window analyzed"
        );

        WeeklyInsights {
            sleep_consistency,
            training_progression,
            stress_indicators,
            performance_markers,
            adaptation_signals,
        }
    }

    /// Compare the newest 3 HRV readings against a non-adjacent older slice
    /// (offsets 4..6); a >10% rise marks positive adaptation. A strict
    /// night-over-night decline across the newest 3 readings flags the
    /// opposite signal.
    fn adaptation_signals(hrv_values: &[f64]) -> Vec<String> {
        let mut signals = Vec::new();
        if hrv_values.len() >= 7 {
            let recent = baseline(&hrv_values[..3]);
            let older = baseline(&hrv_values[4..7]);
            if recent > older * 1.1 {
                signals.push("Positive adaptation - HRV improving".to_string());
            }
        }
        // Newest-first: each night strictly below the one before it
        if hrv_values.len() >= 3 && hrv_values[0] < hrv_values[1] && hrv_values[1] < hrv_values[2] {
            signals.push("HRV declining 3 days straight - prioritize recovery".to_string());
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sleep_sample(day: u32, minutes: f64) -> SleepSample {
        SleepSample::new(NaiveDate::from_ymd_opt(2025, 6, day).unwrap(), 85.0, minutes)
    }

    fn activity(day: u32, hour: u32, tss: f64) -> ActivitySample {
        ActivitySample {
            start_time: Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
            duration_seconds: 3600,
            distance_meters: None,
            tss_estimated: Some(tss),
        }
    }

    #[test]
    fn test_training_progression_cutoffs() {
        assert_eq!(
            TrainingProgression::from_load(450.0, 7),
            TrainingProgression::Overreaching
        );
        assert_eq!(
            TrainingProgression::from_load(250.0, 5),
            TrainingProgression::Building
        );
        assert_eq!(
            TrainingProgression::from_load(180.0, 1),
            TrainingProgression::Recovering
        );
        assert_eq!(
            TrainingProgression::from_load(50.0, 3),
            TrainingProgression::Maintaining
        );
        // Volume alone is not overreaching without the frequency
        assert_eq!(
            TrainingProgression::from_load(450.0, 6),
            TrainingProgression::Building
        );
    }

    #[test]
    fn test_stress_indicator_day_counts() {
        let mut samples: Vec<SleepSample> =
            (1..=7).rev().map(|d| sleep_sample(d, 420.0)).collect();
        // Baseline HRV = 45; two nights fall below 0.9 * 45 = 40.5
        let hrv = [50.0, 50.0, 50.0, 50.0, 50.0, 35.0, 30.0];
        // Baseline RHR = 54; one night exceeds 1.05 * 54 = 56.7
        let rhr = [52.0, 52.0, 52.0, 52.0, 52.0, 53.0, 65.0];
        for (i, s) in samples.iter_mut().enumerate() {
            s.hrv_avg = Some(hrv[i]);
            s.resting_heart_rate = Some(rhr[i]);
        }

        let insights = WeeklyAnalyzer::analyze(&samples, &[]);
        assert_eq!(insights.stress_indicators.poor_hrv_days, 2);
        assert_eq!(insights.stress_indicators.elevated_rhr_days, 1);
    }

    #[test]
    fn test_performance_markers_and_negative_recovery_days() {
        let activities: Vec<ActivitySample> = (1..=9)
            .map(|d| activity(d, 8, if d % 2 == 0 { 80.0 } else { 30.0 }))
            .collect();
        let insights = WeeklyAnalyzer::analyze(&[sleep_sample(10, 420.0)], &activities);
        assert_eq!(insights.performance_markers.quality_sessions, 4);
        // 9 sessions in the window: recovery days go negative, unclamped
        assert_eq!(insights.performance_markers.recovery_days, -2);
    }

    #[test]
    fn test_adaptation_signal_needs_clear_hrv_rise() {
        let mut samples: Vec<SleepSample> =
            (1..=7).rev().map(|d| sleep_sample(d, 420.0)).collect();
        // Newest 3 average 55, offset-4..6 slice averages 40: 55 > 44 fires
        let hrv = [56.0, 55.0, 54.0, 48.0, 41.0, 40.0, 39.0];
        for (i, s) in samples.iter_mut().enumerate() {
            s.hrv_avg = Some(hrv[i]);
        }
        let insights = WeeklyAnalyzer::analyze(&samples, &[]);
        assert_eq!(
            insights.adaptation_signals,
            vec!["Positive adaptation - HRV improving".to_string()]
        );

        // Six readings are not enough
        let insights = WeeklyAnalyzer::analyze(&samples[..6], &[]);
        assert!(insights.adaptation_signals.is_empty());
    }

    #[test]
    fn test_three_night_hrv_slide_signals_recovery_need() {
        let mut samples: Vec<SleepSample> =
            (1..=7).rev().map(|d| sleep_sample(d, 420.0)).collect();
        // Newest three nights fall strictly: 38 < 42 < 47
        let hrv = [38.0, 42.0, 47.0, 48.0, 47.0, 48.0, 47.0];
        for (i, s) in samples.iter_mut().enumerate() {
            s.hrv_avg = Some(hrv[i]);
        }
        let insights = WeeklyAnalyzer::analyze(&samples, &[]);
        assert_eq!(
            insights.adaptation_signals,
            vec!["HRV declining 3 days straight - prioritize recovery".to_string()]
        );

        // A flat night breaks the streak: 42, 42, 47 is not monotonic
        samples[0].hrv_avg = Some(42.0);
        samples[1].hrv_avg = Some(42.0);
        let insights = WeeklyAnalyzer::analyze(&samples, &[]);
        assert!(insights.adaptation_signals.is_empty());
    }

    #[test]
    fn test_sleep_consistency_reflects_duration_scatter() {
        let steady: Vec<SleepSample> = (1..=7).rev().map(|d| sleep_sample(d, 430.0)).collect();
        let insights = WeeklyAnalyzer::analyze(&steady, &[]);
        assert_eq!(insights.sleep_consistency, 100.0);

        let erratic: Vec<SleepSample> = (1..=7)
            .rev()
            .map(|d| sleep_sample(d, if d % 2 == 0 { 300.0 } else { 540.0 }))
            .collect();
        let insights = WeeklyAnalyzer::analyze(&erratic, &[]);
        assert!(insights.sleep_consistency < 80.0);
    }
}
