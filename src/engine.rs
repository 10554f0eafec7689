//! Score computation
//!
//! This module turns a week of health metrics into the composite wellness
//! score and provides the pure helpers the dashboard shows next to it:
//! - Component scores for steps, sleep and heart rate
//! - Total score clamped to 0-100
//! - Sleep deficit, sleep alert and status labels
//!
//! Every function here is total over non-negative input and has no side
//! effects. Missing data is a zero metric and lands in the lowest tier.

use crate::config::{
    PresentationConfig, DEFAULT_EXERCISE_GOAL_STEPS, DEFAULT_SLEEP_ALERT_MINUTES,
    DEFAULT_STABLE_HEART_RATE, DEFAULT_TARGET_SLEEP_HOURS,
};
use crate::types::{ExerciseStatus, HealthMetrics, HeartRateStatus, ScoreResult, SleepStatus};

/// Lowest composite score
pub const MIN_TOTAL_SCORE: u32 = 0;

/// Highest composite score
pub const MAX_TOTAL_SCORE: u32 = 100;

/// Step tiers over the 7-day window, highest first: (minimum steps, score)
const STEP_TIERS: [(u64, u32); 4] = [(70_000, 40), (50_000, 30), (30_000, 20), (10_000, 15)];
const STEP_FLOOR: u32 = 10;

/// Sleep tiers over the 7-day window, highest first: (minimum hours, score).
/// 49, 42 and 35 hours are 7, 6 and 5 hours a night.
const SLEEP_TIERS: [(f64, u32); 3] = [(49.0, 40), (42.0, 30), (35.0, 20)];
const SLEEP_FLOOR: u32 = 10;

/// Heart rate bands, best first: (inclusive bpm range, score)
const HEART_RATE_BANDS: [(u32, u32, u32); 3] = [(60, 80, 20), (50, 59, 15), (81, 100, 10)];
const HEART_RATE_FLOOR: u32 = 5;

/// Compute the composite score for a week of metrics.
///
/// Only the three scored aggregates are read; extended fields are ignored.
pub fn compute_score(metrics: &HealthMetrics) -> ScoreResult {
    let exercise_score = step_score(metrics.total_steps);
    let sleep_score = sleep_score(metrics.weekly_sleep_hours);
    let heart_rate_score = heart_rate_score(metrics.average_heart_rate);

    ScoreResult {
        exercise_score,
        sleep_score,
        heart_rate_score,
        total_score: total_score(exercise_score, sleep_score, heart_rate_score),
    }
}

/// Component score for steps accumulated over the week
pub fn step_score(total_steps: u64) -> u32 {
    STEP_TIERS
        .iter()
        .find(|(min, _)| total_steps >= *min)
        .map_or(STEP_FLOOR, |(_, score)| *score)
}

/// Component score for sleep hours accumulated over the week.
///
/// A NaN input matches no tier and scores the floor.
pub fn sleep_score(weekly_sleep_hours: f64) -> u32 {
    SLEEP_TIERS
        .iter()
        .find(|(min, _)| weekly_sleep_hours >= *min)
        .map_or(SLEEP_FLOOR, |(_, score)| *score)
}

/// Component score for the weekly average heart rate.
///
/// 0 bpm means no samples and scores the floor; callers flag missing data
/// from the raw metric, not from this score.
pub fn heart_rate_score(average_heart_rate: u32) -> u32 {
    HEART_RATE_BANDS
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&average_heart_rate))
        .map_or(HEART_RATE_FLOOR, |(_, _, score)| *score)
}

/// Sum the components and clamp to the score range.
///
/// The clamp holds regardless of how the tier tables evolve.
pub fn total_score(exercise_score: u32, sleep_score: u32, heart_rate_score: u32) -> u32 {
    exercise_score
        .saturating_add(sleep_score)
        .saturating_add(heart_rate_score)
        .clamp(MIN_TOTAL_SCORE, MAX_TOTAL_SCORE)
}

/// Minutes short of a 7-hour night.
///
/// Takes a per-night figure, not the weekly total used for scoring.
pub fn sleep_deficit_minutes(per_night_sleep_hours: f64) -> u32 {
    deficit_minutes(per_night_sleep_hours, DEFAULT_TARGET_SLEEP_HOURS)
}

/// Minutes short of the configured nightly target
pub fn sleep_deficit_minutes_with(per_night_sleep_hours: f64, config: &PresentationConfig) -> u32 {
    deficit_minutes(per_night_sleep_hours, config.target_sleep_hours)
}

fn deficit_minutes(per_night_sleep_hours: f64, target_hours: f64) -> u32 {
    let minutes = ((target_hours - per_night_sleep_hours) * 60.0).round();
    if minutes > 0.0 {
        // float to int casts saturate
        minutes as u32
    } else {
        0
    }
}

/// Whether the sleep alert is shown for a deficit
pub fn show_sleep_alert(deficit_minutes: u32) -> bool {
    deficit_minutes > DEFAULT_SLEEP_ALERT_MINUTES
}

pub fn show_sleep_alert_with(deficit_minutes: u32, config: &PresentationConfig) -> bool {
    deficit_minutes > config.sleep_alert_minutes
}

/// Exercise label for a step figure (today's steps when available)
pub fn exercise_status(steps: u64) -> ExerciseStatus {
    exercise_label(steps, DEFAULT_EXERCISE_GOAL_STEPS)
}

pub fn exercise_status_with(steps: u64, config: &PresentationConfig) -> ExerciseStatus {
    exercise_label(steps, config.exercise_goal_steps)
}

fn exercise_label(steps: u64, goal: u64) -> ExerciseStatus {
    if steps >= goal {
        ExerciseStatus::Good
    } else {
        ExerciseStatus::NeedsImprovement
    }
}

/// Heart rate label for an average bpm
pub fn heart_rate_status(average_heart_rate: u32) -> HeartRateStatus {
    let (low, high) = DEFAULT_STABLE_HEART_RATE;
    heart_rate_label(average_heart_rate, low, high)
}

pub fn heart_rate_status_with(average_heart_rate: u32, config: &PresentationConfig) -> HeartRateStatus {
    heart_rate_label(average_heart_rate, config.stable_hr_min, config.stable_hr_max)
}

fn heart_rate_label(average_heart_rate: u32, low: u32, high: u32) -> HeartRateStatus {
    if (low..=high).contains(&average_heart_rate) {
        HeartRateStatus::Stable
    } else {
        HeartRateStatus::NeedsReview
    }
}

/// Sleep label for a per-night figure
pub fn sleep_status(per_night_sleep_hours: f64) -> SleepStatus {
    sleep_label(per_night_sleep_hours, DEFAULT_TARGET_SLEEP_HOURS)
}

pub fn sleep_status_with(per_night_sleep_hours: f64, config: &PresentationConfig) -> SleepStatus {
    sleep_label(per_night_sleep_hours, config.target_sleep_hours)
}

fn sleep_label(per_night_sleep_hours: f64, target_hours: f64) -> SleepStatus {
    if per_night_sleep_hours >= target_hours {
        SleepStatus::Good
    } else {
        SleepStatus::NeedsImprovement
    }
}
