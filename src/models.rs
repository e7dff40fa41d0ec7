//! Input data model for the health-trend summarization engine.
//!
//! The engine consumes strongly-typed sample rows constructed once at the
//! data-access boundary. All "missing column" uncertainty is resolved there;
//! inside the engine an absent metric is always an explicit `Option`.
//!
//! Both sample collections are supplied sorted newest-first and already
//! filtered to the relevant lookback window. The analyzers re-slice but never
//! re-sort or re-fetch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One calendar day's sleep record from the sleep-tracking provider.
///
/// At most one sample exists per user per date. Samples are immutable once
/// recorded and consumed newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSample {
    /// Calendar day the sleep record belongs to
    pub date: NaiveDate,

    /// Sleep efficiency percentage (0-100)
    pub sleep_efficiency: f64,

    /// Total sleep duration in minutes
    pub total_sleep_minutes: f64,

    /// Average overnight HRV in milliseconds, if the device reported one
    pub hrv_avg: Option<f64>,

    /// Resting heart rate in bpm, if reported
    pub resting_heart_rate: Option<f64>,

    /// Skin temperature deviation from personal baseline in °C, if reported
    pub temperature_deviation: Option<f64>,

    /// Provider readiness score (0-100 composite recovery metric)
    pub readiness_score: Option<f64>,

    /// When the user went to bed, if tracked
    pub bedtime_start: Option<DateTime<Utc>>,
}

impl SleepSample {
    /// Minimal sample with only the required fields set.
    pub fn new(date: NaiveDate, sleep_efficiency: f64, total_sleep_minutes: f64) -> Self {
        SleepSample {
            date,
            sleep_efficiency,
            total_sleep_minutes,
            hrv_avg: None,
            resting_heart_rate: None,
            temperature_deviation: None,
            readiness_score: None,
            bedtime_start: None,
        }
    }
}

/// One recorded workout from the activity provider.
///
/// Multiple samples per day are permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySample {
    /// Workout start timestamp
    pub start_time: DateTime<Utc>,

    /// Elapsed duration in seconds
    pub duration_seconds: u32,

    /// Distance covered in meters, if the activity has one
    pub distance_meters: Option<f64>,

    /// Estimated training stress score (unitless load estimate)
    ///
    /// May be absent; aggregates treat a missing value as 0.
    pub tss_estimated: Option<f64>,
}

impl ActivitySample {
    /// TSS contribution of this activity (0 when no estimate exists).
    pub fn tss(&self) -> f64 {
        self.tss_estimated.unwrap_or(0.0)
    }

    /// Calendar day the activity started on.
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// User context carried through to the summary for the downstream
/// prose generator. The engine itself derives nothing from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: Option<u8>,

    /// Self-reported sex
    pub sex: Option<String>,

    /// Free-text training goal (e.g. "marathon PB", "general fitness")
    pub training_goal: Option<String>,

    /// Free-text experience level (e.g. "beginner", "competitive")
    pub experience_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_activity_tss_defaults_to_zero() {
        let activity = ActivitySample {
            start_time: Utc.with_ymd_and_hms(2025, 6, 2, 7, 30, 0).unwrap(),
            duration_seconds: 3600,
            distance_meters: Some(10_000.0),
            tss_estimated: None,
        };
        assert_eq!(activity.tss(), 0.0);
        assert_eq!(activity.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn test_sleep_sample_roundtrips_through_json() {
        let sample = SleepSample {
            hrv_avg: Some(48.5),
            resting_heart_rate: Some(52.0),
            ..SleepSample::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), 88.0, 432.0)
        };
        let json = serde_json::to_string(&sample).unwrap();
        let back: SleepSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
