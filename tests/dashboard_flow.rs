//! End-to-end flow: records → source selection → store → report

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use wellness_score::encoder::ReportEncoder;
use wellness_score::source::LiveSource;
use wellness_score::{
    compute_score, select_source, Capability, DashboardStore, DataOrigin, HealthMetrics,
    PresentationConfig, ScoreResult,
};

const RECORDS: &str = r#"{
    "steps": [
        {"start": "2024-01-09T09:00:00Z", "end": "2024-01-09T18:00:00Z", "count": 11000},
        {"start": "2024-01-10T09:00:00Z", "end": "2024-01-10T18:00:00Z", "count": 9000},
        {"start": "2024-01-11T09:00:00Z", "end": "2024-01-11T18:00:00Z", "count": 10000},
        {"start": "2024-01-12T09:00:00Z", "end": "2024-01-12T18:00:00Z", "count": 10000},
        {"start": "2024-01-13T09:00:00Z", "end": "2024-01-13T18:00:00Z", "count": 10000},
        {"start": "2024-01-14T09:00:00Z", "end": "2024-01-14T18:00:00Z", "count": 10000},
        {"start": "2024-01-15T09:00:00Z", "end": "2024-01-15T18:00:00Z", "count": 10000}
    ],
    "sleep_sessions": [
        {"start": "2024-01-09T23:00:00Z", "end": "2024-01-10T06:00:00Z"},
        {"start": "2024-01-10T23:00:00Z", "end": "2024-01-11T06:00:00Z"},
        {"start": "2024-01-11T23:00:00Z", "end": "2024-01-12T06:00:00Z"},
        {"start": "2024-01-12T23:00:00Z", "end": "2024-01-13T06:00:00Z"},
        {"start": "2024-01-13T23:00:00Z", "end": "2024-01-14T06:00:00Z"},
        {"start": "2024-01-14T23:00:00Z", "end": "2024-01-15T06:00:00Z"},
        {"start": "2024-01-15T00:30:00Z", "end": "2024-01-15T00:00:00Z"}
    ],
    "heart_rate": [
        {"time": "2024-01-12T08:00:00Z", "bpm": 62},
        {"time": "2024-01-13T08:00:00Z", "bpm": 66},
        {"time": "2024-01-14T08:00:00Z", "bpm": 70}
    ]
}"#;

fn live_source() -> LiveSource {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
    LiveSource::from_json(RECORDS, now).unwrap()
}

#[test]
fn live_records_flow_into_published_state() {
    let mut store = DashboardStore::new(PresentationConfig::default());
    let rx = store.subscribe();

    let source = select_source(Capability::Available, Some(live_source()));
    store.refresh(source.as_ref());

    let initial = rx.recv().unwrap();
    assert!(initial.view.is_none());

    let state = rx.recv().unwrap();
    assert!(state.is_linked);
    let view = state.view.as_ref().unwrap();

    assert_eq!(view.metrics.total_steps, 70_000);
    assert_eq!(view.metrics.weekly_sleep_hours, 42.0);
    assert_eq!(view.metrics.average_heart_rate, 66);
    assert_eq!(
        view.score,
        ScoreResult {
            exercise_score: 40,
            sleep_score: 30,
            heart_rate_score: 20,
            total_score: 90,
        }
    );
    assert_eq!(view.per_night_sleep_hours, 7.0);
    assert!(!view.show_sleep_alert);

    let report = ReportEncoder::with_instance_id("it".into()).encode(view);
    assert_eq!(report.presentation.exercise_status, "good");
    assert_eq!(report.presentation.heart_rate_status, "stable");
}

#[test]
fn unavailable_capability_publishes_demo_state() {
    let mut store = DashboardStore::default();
    let source = select_source(Capability::Unavailable, Some(live_source()));
    let state = store.refresh(source.as_ref());

    assert!(!state.is_linked);
    assert_eq!(state.view.as_ref().unwrap().origin, DataOrigin::Demo);
}

#[test]
fn perfect_and_empty_weeks() {
    assert_eq!(compute_score(&HealthMetrics::new(70_000, 49.0, 70)).total_score, 100);
    assert_eq!(compute_score(&HealthMetrics::new(0, 0.0, 0)).total_score, 25);
}
