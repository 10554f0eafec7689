//! Raw health records and weekly aggregation
//!
//! Records are plain timestamped values (step counts, sleep sessions, heart
//! rate samples). `aggregate` folds the ones inside the trailing window into
//! `HealthMetrics`:
//! - Steps are summed, and bucketed per UTC day for the daily breakdown
//! - Sleep is the sum of session durations, negative sessions counting zero
//! - Heart rate is the rounded mean of all samples, 0 when there are none

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoreError;
use crate::types::{HealthMetrics, WINDOW_DAYS};

/// Steps counted over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
}

/// One sleep session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepSession {
    /// Session length in seconds, never negative
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// One heart rate reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub time: DateTime<Utc>,
    pub bpm: u32,
}

/// A batch of raw records as read from the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub steps: Vec<StepRecord>,
    #[serde(default, alias = "sleep")]
    pub sleep_sessions: Vec<SleepSession>,
    #[serde(default, alias = "heart_rate_samples")]
    pub heart_rate: Vec<HeartRateSample>,
}

impl RecordSet {
    /// Parse a record set from JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        let records: RecordSet = serde_json::from_str(json)?;
        records.validate()?;
        Ok(records)
    }

    /// Reject step records that end before they start.
    ///
    /// Sleep sessions are not checked; an inverted session counts as zero.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if let Some((index, record)) = self
            .steps
            .iter()
            .enumerate()
            .find(|(_, r)| r.end < r.start)
        {
            return Err(ScoreError::InvalidRecord(format!(
                "step record {index} ends at {} before it starts at {}",
                record.end.to_rfc3339(),
                record.start.to_rfc3339()
            )));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.sleep_sessions.is_empty() && self.heart_rate.is_empty()
    }
}

/// Aggregate the records falling in `[now - 7 days, now]` into weekly metrics.
///
/// Steps and sleep are attributed by start time, heart rate samples by their
/// own time. Today's and yesterday's sleep are attributed by session end.
pub fn aggregate(records: &RecordSet, now: DateTime<Utc>) -> HealthMetrics {
    let window_start = now - Duration::days(WINDOW_DAYS as i64);
    let in_window = |t: &DateTime<Utc>| *t >= window_start && *t <= now;

    let steps: Vec<&StepRecord> = records.steps.iter().filter(|r| in_window(&r.start)).collect();
    let sessions: Vec<&SleepSession> = records
        .sleep_sessions
        .iter()
        .filter(|s| in_window(&s.start))
        .collect();
    let samples: Vec<&HeartRateSample> = records
        .heart_rate
        .iter()
        .filter(|s| in_window(&s.time))
        .collect();

    let total_steps = saturating_step_sum(steps.iter().copied());
    let weekly_sleep_hours = seconds_to_hours(sessions.iter().map(|s| s.duration_secs()).sum());
    let average_heart_rate = mean_bpm(&samples);

    let today = now.date_naive();
    let daily_steps = daily_step_buckets(&steps, today);
    let today_steps = daily_steps.last().copied();
    let today_sleep_hours = sleep_ending_on(&sessions, today);
    let yesterday_sleep_hours = sleep_ending_on(&sessions, today - Duration::days(1));

    debug!(
        total_steps,
        weekly_sleep_hours,
        average_heart_rate,
        heart_rate_samples = samples.len(),
        "aggregated health records"
    );

    HealthMetrics {
        total_steps,
        weekly_sleep_hours,
        average_heart_rate,
        today_steps,
        daily_steps: Some(daily_steps),
        today_sleep_hours: Some(today_sleep_hours),
        yesterday_sleep_hours: Some(yesterday_sleep_hours),
    }
}

fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

fn mean_bpm(samples: &[&HeartRateSample]) -> u32 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u64 = samples.iter().map(|s| u64::from(s.bpm)).sum();
    (sum as f64 / samples.len() as f64).round() as u32
}

/// Steps per UTC day for the 7 days ending at `today`, oldest first
fn daily_step_buckets(steps: &[&StepRecord], today: NaiveDate) -> Vec<u64> {
    (0..WINDOW_DAYS)
        .rev()
        .map(|days_back| {
            let day = today - Duration::days(days_back as i64);
            saturating_step_sum(
                steps
                    .iter()
                    .copied()
                    .filter(|r| r.start.date_naive() == day),
            )
        })
        .collect()
}

/// Counts are arbitrary `u64`s from the platform; totals pin at `u64::MAX`
fn saturating_step_sum<'a>(records: impl Iterator<Item = &'a StepRecord>) -> u64 {
    records.fold(0u64, |acc, r| acc.saturating_add(r.count))
}

fn sleep_ending_on(sessions: &[&SleepSession], day: NaiveDate) -> f64 {
    seconds_to_hours(
        sessions
            .iter()
            .filter(|s| s.end.date_naive() == day)
            .map(|s| s.duration_secs())
            .sum(),
    )
}
