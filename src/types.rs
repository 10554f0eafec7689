//! Core types for the wellness score engine
//!
//! This module defines the values that flow through the crate: the weekly
//! metrics handed in by a data source, the score computed from them, and the
//! status labels shown next to the score.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Number of days in the trailing aggregation window
pub const WINDOW_DAYS: usize = 7;

/// Where a set of metrics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Demo,
}

impl DataOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataOrigin::Live => "live",
            DataOrigin::Demo => "demo",
        }
    }
}

/// Aggregated health metrics over the trailing 7-day window.
///
/// A metric with no underlying data is zero, never absent. The optional
/// fields are carried through for presentation and take no part in scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// Steps accumulated over the window
    #[serde(alias = "totalSteps", alias = "steps")]
    pub total_steps: u64,
    /// Total sleep over the window, in hours
    #[serde(alias = "weeklySleepHours", alias = "totalSleepHours", alias = "sleepHours")]
    pub weekly_sleep_hours: f64,
    /// Mean bpm across all samples in the window (0 if no samples)
    #[serde(alias = "averageHeartRate", alias = "heartRate")]
    pub average_heart_rate: u32,
    /// Steps recorded today
    #[serde(default, alias = "todaySteps", skip_serializing_if = "Option::is_none")]
    pub today_steps: Option<u64>,
    /// Steps per day, oldest to newest
    #[serde(default, alias = "dailySteps", skip_serializing_if = "Option::is_none")]
    pub daily_steps: Option<Vec<u64>>,
    /// Sleep for the most recent night, in hours
    #[serde(default, alias = "todaySleepHours", skip_serializing_if = "Option::is_none")]
    pub today_sleep_hours: Option<f64>,
    /// Sleep for the night before, in hours
    #[serde(
        default,
        alias = "yesterdaySleepHours",
        skip_serializing_if = "Option::is_none"
    )]
    pub yesterday_sleep_hours: Option<f64>,
}

impl HealthMetrics {
    /// Create metrics carrying only the three scored aggregates
    pub fn new(total_steps: u64, weekly_sleep_hours: f64, average_heart_rate: u32) -> Self {
        Self {
            total_steps,
            weekly_sleep_hours,
            average_heart_rate,
            ..Default::default()
        }
    }

    /// Parse metrics from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        let metrics: HealthMetrics = serde_json::from_str(json)?;
        metrics.validate()?;
        Ok(metrics)
    }

    /// Check the invariants a data source must uphold.
    pub fn validate(&self) -> Result<(), ScoreError> {
        check_hours("weekly_sleep_hours", Some(self.weekly_sleep_hours))?;
        check_hours("today_sleep_hours", self.today_sleep_hours)?;
        check_hours("yesterday_sleep_hours", self.yesterday_sleep_hours)?;

        if let Some(daily) = &self.daily_steps {
            if daily.len() != WINDOW_DAYS {
                return Err(ScoreError::InvalidMetrics(format!(
                    "daily_steps must hold {WINDOW_DAYS} entries, got {}",
                    daily.len()
                )));
            }
        }

        Ok(())
    }
}

fn check_hours(field: &str, value: Option<f64>) -> Result<(), ScoreError> {
    match value {
        Some(hours) if !hours.is_finite() => Err(ScoreError::InvalidMetrics(format!(
            "{field} must be finite, got {hours}"
        ))),
        Some(hours) if hours < 0.0 => Err(ScoreError::InvalidMetrics(format!(
            "{field} must be non-negative, got {hours}"
        ))),
        _ => Ok(()),
    }
}

/// Composite score and its three components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Component from weekly steps, one of 10, 15, 20, 30, 40
    pub exercise_score: u32,
    /// Component from weekly sleep hours, one of 10, 20, 30, 40
    pub sleep_score: u32,
    /// Component from average heart rate, one of 5, 10, 15, 20
    pub heart_rate_score: u32,
    /// Sum of the components, clamped to 0-100
    pub total_score: u32,
}

/// Exercise status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    Good,
    NeedsImprovement,
}

impl ExerciseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStatus::Good => "good",
            ExerciseStatus::NeedsImprovement => "needs improvement",
        }
    }
}

/// Sleep status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStatus {
    Good,
    NeedsImprovement,
}

impl SleepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStatus::Good => "good",
            SleepStatus::NeedsImprovement => "needs improvement",
        }
    }
}

/// Heart rate status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateStatus {
    Stable,
    NeedsReview,
}

impl HeartRateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartRateStatus::Stable => "stable",
            HeartRateStatus::NeedsReview => "needs review",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_camel_case_metrics() {
        let json = r#"{
            "totalSteps": 59200,
            "totalSleepHours": 45.5,
            "averageHeartRate": 72,
            "todaySteps": 8000,
            "dailySteps": [7500, 8200, 9100, 8500, 7800, 9500, 8000]
        }"#;
        let metrics = HealthMetrics::from_json(json).unwrap();

        assert_eq!(metrics.total_steps, 59200);
        assert_eq!(metrics.weekly_sleep_hours, 45.5);
        assert_eq!(metrics.average_heart_rate, 72);
        assert_eq!(metrics.today_steps, Some(8000));
        assert_eq!(metrics.daily_steps.as_ref().map(Vec::len), Some(7));
        assert_eq!(metrics.today_sleep_hours, None);
    }

    #[test]
    fn test_parse_dashboard_bridge_document() {
        // shape posted to the web dashboard; the score field is ignored
        let json = r#"{"exerciseScore": 75, "sleepHours": 6.2, "steps": 8342, "heartRate": 68}"#;
        let metrics = HealthMetrics::from_json(json).unwrap();

        assert_eq!(metrics, HealthMetrics::new(8342, 6.2, 68));
    }

    #[test]
    fn test_serialize_skips_absent_extended_fields() {
        let metrics = HealthMetrics::new(1000, 10.0, 65);
        let value = serde_json::to_value(&metrics).unwrap();

        assert_eq!(value["total_steps"], 1000);
        assert!(value.get("daily_steps").is_none());
        assert!(value.get("today_sleep_hours").is_none());
    }

    #[test]
    fn test_validate_rejects_negative_sleep() {
        let metrics = HealthMetrics::new(0, -1.0, 0);
        assert!(matches!(
            metrics.validate(),
            Err(ScoreError::InvalidMetrics(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_sleep() {
        let metrics = HealthMetrics {
            today_sleep_hours: Some(f64::NAN),
            ..HealthMetrics::new(0, 0.0, 0)
        };
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_daily_steps() {
        let metrics = HealthMetrics {
            daily_steps: Some(vec![1, 2, 3]),
            ..HealthMetrics::new(6, 0.0, 0)
        };
        let err = metrics.validate().unwrap_err();
        assert!(err.to_string().contains("daily_steps"));
    }

    #[test]
    fn test_negative_steps_fail_to_parse() {
        let json = r#"{"total_steps": -5, "weekly_sleep_hours": 0.0, "average_heart_rate": 0}"#;
        assert!(matches!(
            HealthMetrics::from_json(json),
            Err(ScoreError::JsonError(_))
        ));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ExerciseStatus::Good.as_str(), "good");
        assert_eq!(ExerciseStatus::NeedsImprovement.as_str(), "needs improvement");
        assert_eq!(SleepStatus::NeedsImprovement.as_str(), "needs improvement");
        assert_eq!(HeartRateStatus::Stable.as_str(), "stable");
        assert_eq!(HeartRateStatus::NeedsReview.as_str(), "needs review");
        assert_eq!(DataOrigin::Demo.as_str(), "demo");
    }
}
