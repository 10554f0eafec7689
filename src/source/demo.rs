//! Fixed demo data source

use crate::error::ScoreError;
use crate::types::{DataOrigin, HealthMetrics};

use super::HealthDataSource;

/// Demo steps per day, oldest to newest
pub const DEMO_DAILY_STEPS: [u64; 7] = [7500, 8200, 9100, 8500, 7800, 9500, 8000];

const DEMO_WEEKLY_SLEEP_HOURS: f64 = 6.5;
const DEMO_TODAY_SLEEP_HOURS: f64 = 7.0;
const DEMO_YESTERDAY_SLEEP_HOURS: f64 = 6.5;
const DEMO_HEART_RATE: u32 = 72;

/// Source that always returns the same demo week
pub struct DemoSource;

impl HealthDataSource for DemoSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Demo
    }

    fn fetch(&self) -> Result<HealthMetrics, ScoreError> {
        Ok(demo_metrics())
    }
}

/// The demo week shown when no live data can be read
pub fn demo_metrics() -> HealthMetrics {
    HealthMetrics {
        total_steps: DEMO_DAILY_STEPS.iter().sum(),
        weekly_sleep_hours: DEMO_WEEKLY_SLEEP_HOURS,
        average_heart_rate: DEMO_HEART_RATE,
        today_steps: DEMO_DAILY_STEPS.last().copied(),
        daily_steps: Some(DEMO_DAILY_STEPS.to_vec()),
        today_sleep_hours: Some(DEMO_TODAY_SLEEP_HOURS),
        yesterday_sleep_hours: Some(DEMO_YESTERDAY_SLEEP_HOURS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_score;

    #[test]
    fn test_demo_metrics() {
        let metrics = DemoSource.fetch().unwrap();

        assert_eq!(metrics.total_steps, 58_600);
        assert_eq!(metrics.today_steps, Some(8000));
        assert_eq!(metrics.average_heart_rate, 72);
        assert!(metrics.validate().is_ok());
    }

    #[test]
    fn test_demo_score() {
        let score = compute_score(&demo_metrics());

        assert_eq!(score.exercise_score, 30);
        assert_eq!(score.sleep_score, 10);
        assert_eq!(score.heart_rate_score, 20);
        assert_eq!(score.total_score, 60);
    }
}
