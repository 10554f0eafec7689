//! Presentation configuration
//!
//! Targets used by the dashboard helpers. Scoring thresholds are fixed and do
//! not live here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ScoreError;

/// Default nightly sleep target in hours
pub const DEFAULT_TARGET_SLEEP_HOURS: f64 = 7.0;

/// Deficit above which the sleep alert is shown, in minutes
pub const DEFAULT_SLEEP_ALERT_MINUTES: u32 = 60;

/// Step count at which exercise is reported as good
pub const DEFAULT_EXERCISE_GOAL_STEPS: u64 = 8000;

/// Inclusive heart rate range reported as stable (bpm)
pub const DEFAULT_STABLE_HEART_RATE: (u32, u32) = (60, 100);

pub const ENV_TARGET_SLEEP_HOURS: &str = "WELLNESS_TARGET_SLEEP_HOURS";
pub const ENV_SLEEP_ALERT_MINUTES: &str = "WELLNESS_SLEEP_ALERT_MINUTES";
pub const ENV_EXERCISE_GOAL_STEPS: &str = "WELLNESS_EXERCISE_GOAL_STEPS";
pub const ENV_STABLE_HR_MIN: &str = "WELLNESS_STABLE_HR_MIN";
pub const ENV_STABLE_HR_MAX: &str = "WELLNESS_STABLE_HR_MAX";

/// Targets for the derived dashboard fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Nightly sleep target (hours)
    pub target_sleep_hours: f64,
    /// Sleep alert fires when the deficit exceeds this many minutes
    pub sleep_alert_minutes: u32,
    /// Daily step goal
    pub exercise_goal_steps: u64,
    /// Lower bound of the stable heart rate range (bpm, inclusive)
    pub stable_hr_min: u32,
    /// Upper bound of the stable heart rate range (bpm, inclusive)
    pub stable_hr_max: u32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            target_sleep_hours: DEFAULT_TARGET_SLEEP_HOURS,
            sleep_alert_minutes: DEFAULT_SLEEP_ALERT_MINUTES,
            exercise_goal_steps: DEFAULT_EXERCISE_GOAL_STEPS,
            stable_hr_min: DEFAULT_STABLE_HEART_RATE.0,
            stable_hr_max: DEFAULT_STABLE_HEART_RATE.1,
        }
    }
}

impl PresentationConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ScoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Read overrides through `get`, falling back to defaults for unset keys.
    ///
    /// Taking a getter keeps tests away from the global environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ScoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            target_sleep_hours: parse_or(
                &mut get,
                ENV_TARGET_SLEEP_HOURS,
                defaults.target_sleep_hours,
            )?,
            sleep_alert_minutes: parse_or(
                &mut get,
                ENV_SLEEP_ALERT_MINUTES,
                defaults.sleep_alert_minutes,
            )?,
            exercise_goal_steps: parse_or(
                &mut get,
                ENV_EXERCISE_GOAL_STEPS,
                defaults.exercise_goal_steps,
            )?,
            stable_hr_min: parse_or(&mut get, ENV_STABLE_HR_MIN, defaults.stable_hr_min)?,
            stable_hr_max: parse_or(&mut get, ENV_STABLE_HR_MAX, defaults.stable_hr_max)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        if !self.target_sleep_hours.is_finite() || self.target_sleep_hours <= 0.0 {
            return Err(ScoreError::Config(format!(
                "target sleep hours must be positive, got {}",
                self.target_sleep_hours
            )));
        }
        if self.stable_hr_min > self.stable_hr_max {
            return Err(ScoreError::Config(format!(
                "stable heart rate range is empty: {}..={}",
                self.stable_hr_min, self.stable_hr_max
            )));
        }
        Ok(())
    }
}

fn parse_or<F, T>(get: &mut F, key: &str, default: T) -> Result<T, ScoreError>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ScoreError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_unset() {
        let config = PresentationConfig::from_env_with(|_| None).unwrap();
        assert_eq!(config, PresentationConfig::default());
        assert_eq!(config.target_sleep_hours, 7.0);
        assert_eq!(config.sleep_alert_minutes, 60);
        assert_eq!(config.exercise_goal_steps, 8000);
    }

    #[test]
    fn test_reads_overrides() {
        let get = |k: &str| match k {
            ENV_TARGET_SLEEP_HOURS => Some("8".into()),
            ENV_SLEEP_ALERT_MINUTES => Some(" 30 ".into()),
            ENV_EXERCISE_GOAL_STEPS => Some("10000".into()),
            _ => None,
        };
        let config = PresentationConfig::from_env_with(get).unwrap();
        assert_eq!(config.target_sleep_hours, 8.0);
        assert_eq!(config.sleep_alert_minutes, 30);
        assert_eq!(config.exercise_goal_steps, 10000);
        assert_eq!(config.stable_hr_min, 60);
    }

    #[test]
    fn test_rejects_unparseable_value() {
        let get = |k: &str| match k {
            ENV_SLEEP_ALERT_MINUTES => Some("an hour".into()),
            _ => None,
        };
        let err = PresentationConfig::from_env_with(get).unwrap_err();
        assert!(matches!(err, ScoreError::Config(_)));
        assert!(err.to_string().contains(ENV_SLEEP_ALERT_MINUTES));
    }

    #[test]
    fn test_rejects_empty_heart_rate_range() {
        let get = |k: &str| match k {
            ENV_STABLE_HR_MIN => Some("90".into()),
            ENV_STABLE_HR_MAX => Some("70".into()),
            _ => None,
        };
        assert!(PresentationConfig::from_env_with(get).is_err());
    }

    #[test]
    fn test_rejects_non_positive_target() {
        let get = |k: &str| match k {
            ENV_TARGET_SLEEP_HOURS => Some("0".into()),
            _ => None,
        };
        assert!(PresentationConfig::from_env_with(get).is_err());
    }
}
