//! Dashboard view assembly
//!
//! Combines metrics, score and configuration into the flat set of fields a
//! presenter renders. Weekly and per-night sleep stay separate units here:
//! the score reads the weekly total, the deficit reads a per-night figure.

use serde::{Deserialize, Serialize};

use crate::config::PresentationConfig;
use crate::engine;
use crate::types::{
    DataOrigin, ExerciseStatus, HealthMetrics, HeartRateStatus, ScoreResult, SleepStatus,
    WINDOW_DAYS,
};

/// Everything a presenter needs to render one dashboard frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub origin: DataOrigin,
    pub metrics: HealthMetrics,
    pub score: ScoreResult,
    /// Per-night sleep used for the deficit and sleep status (hours)
    pub per_night_sleep_hours: f64,
    /// True when the per-night figure was estimated from the weekly total
    pub per_night_sleep_estimated: bool,
    pub sleep_deficit_minutes: u32,
    pub show_sleep_alert: bool,
    pub exercise_status: ExerciseStatus,
    pub sleep_status: SleepStatus,
    pub heart_rate_status: HeartRateStatus,
    /// False when the source had no heart rate samples
    pub has_heart_rate_data: bool,
}

/// Build the view for a set of metrics and its score
pub fn build_view(
    metrics: &HealthMetrics,
    score: ScoreResult,
    origin: DataOrigin,
    config: &PresentationConfig,
) -> DashboardView {
    let (per_night_sleep_hours, per_night_sleep_estimated) = per_night_sleep(metrics);
    let sleep_deficit_minutes = engine::sleep_deficit_minutes_with(per_night_sleep_hours, config);
    let exercise_steps = metrics.today_steps.unwrap_or(metrics.total_steps);

    DashboardView {
        origin,
        metrics: metrics.clone(),
        score,
        per_night_sleep_hours,
        per_night_sleep_estimated,
        sleep_deficit_minutes,
        show_sleep_alert: engine::show_sleep_alert_with(sleep_deficit_minutes, config),
        exercise_status: engine::exercise_status_with(exercise_steps, config),
        sleep_status: engine::sleep_status_with(per_night_sleep_hours, config),
        heart_rate_status: engine::heart_rate_status_with(metrics.average_heart_rate, config),
        has_heart_rate_data: metrics.average_heart_rate != 0,
    }
}

/// Score the metrics and build their view in one step
pub fn score_and_build(
    metrics: &HealthMetrics,
    origin: DataOrigin,
    config: &PresentationConfig,
) -> DashboardView {
    build_view(metrics, engine::compute_score(metrics), origin, config)
}

/// Per-night sleep: the reported last night when present, else the weekly
/// average flagged as estimated.
fn per_night_sleep(metrics: &HealthMetrics) -> (f64, bool) {
    match metrics.today_sleep_hours {
        Some(hours) => (hours, false),
        None => (metrics.weekly_sleep_hours / WINDOW_DAYS as f64, true),
    }
}
