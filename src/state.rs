//! Dashboard state container
//!
//! Holds the current dashboard state as an immutable snapshot. A refresh
//! builds a new snapshot, swaps it in whole and pushes it to every
//! subscriber. Subscribers never see a partially updated state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::PresentationConfig;
use crate::presentation::{score_and_build, DashboardView};
use crate::source::{fetch_or_demo, HealthDataSource};
use crate::types::{DataOrigin, HealthMetrics};

/// One published dashboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// None until the first refresh
    pub view: Option<DashboardView>,
    /// True when the view was built from live data
    pub is_linked: bool,
    /// Incremented on every publish, starting at 0 for the empty state
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl DashboardState {
    fn empty() -> Self {
        Self {
            view: None,
            is_linked: false,
            revision: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Owner of the current dashboard state and its subscribers
pub struct DashboardStore {
    config: PresentationConfig,
    current: Arc<DashboardState>,
    subscribers: Vec<Sender<Arc<DashboardState>>>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(PresentationConfig::default())
    }
}

impl DashboardStore {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            config,
            current: Arc::new(DashboardState::empty()),
            subscribers: Vec::new(),
        }
    }

    /// The latest snapshot
    pub fn current(&self) -> Arc<DashboardState> {
        Arc::clone(&self.current)
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    /// Subscribe to future snapshots. The current snapshot is sent first.
    pub fn subscribe(&mut self) -> Receiver<Arc<DashboardState>> {
        let (tx, rx) = mpsc::channel();
        // the receiver is alive here, so this cannot fail
        let _ = tx.send(self.current());
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Fetch from `source` (demo data on failure), rebuild and publish.
    pub fn refresh(&mut self, source: &dyn HealthDataSource) -> Arc<DashboardState> {
        let (metrics, origin) = fetch_or_demo(source);
        self.apply(&metrics, origin)
    }

    /// Build a snapshot from already fetched metrics and publish it
    pub fn apply(&mut self, metrics: &HealthMetrics, origin: DataOrigin) -> Arc<DashboardState> {
        let view = score_and_build(metrics, origin, &self.config);
        debug!(
            exercise_score = view.score.exercise_score,
            sleep_score = view.score.sleep_score,
            heart_rate_score = view.score.heart_rate_score,
            total_score = view.score.total_score,
            "computed wellness score"
        );

        let state = Arc::new(DashboardState {
            view: Some(view),
            is_linked: origin == DataOrigin::Live,
            revision: self.current.revision + 1,
            updated_at: Utc::now(),
        });
        self.publish(state)
    }

    fn publish(&mut self, state: Arc<DashboardState>) -> Arc<DashboardState> {
        self.current = Arc::clone(&state);
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(&state)).is_ok());

        info!(
            revision = state.revision,
            linked = state.is_linked,
            subscribers = self.subscribers.len(),
            "published dashboard state"
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use crate::source::{demo_metrics, DemoSource};

    struct DeniedSource;

    impl HealthDataSource for DeniedSource {
        fn origin(&self) -> DataOrigin {
            DataOrigin::Live
        }

        fn fetch(&self) -> Result<HealthMetrics, ScoreError> {
            Err(ScoreError::SourceUnavailable("not granted".into()))
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let store = DashboardStore::default();
        let state = store.current();

        assert!(state.view.is_none());
        assert!(!state.is_linked);
        assert_eq!(state.revision, 0);
    }

    #[test]
    fn test_apply_replaces_state() {
        let mut store = DashboardStore::default();
        let before = store.current();

        let after = store.apply(&HealthMetrics::new(70_000, 49.0, 70), DataOrigin::Live);

        assert_eq!(after.revision, 1);
        assert!(after.is_linked);
        assert_eq!(after.view.as_ref().unwrap().score.total_score, 100);
        // old snapshot is untouched
        assert!(before.view.is_none());
        assert!(Arc::ptr_eq(&after, &store.current()));
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let mut store = DashboardStore::default();
        let rx = store.subscribe();

        let initial = rx.try_recv().unwrap();
        assert_eq!(initial.revision, 0);

        store.refresh(&DemoSource);
        let update = rx.try_recv().unwrap();
        assert_eq!(update.revision, 1);
        assert!(!update.is_linked);
        assert_eq!(update.view.as_ref().unwrap().metrics, demo_metrics());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut store = DashboardStore::default();
        let kept = store.subscribe();
        let dropped = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        drop(dropped);
        store.apply(&HealthMetrics::default(), DataOrigin::Demo);

        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(kept.iter().take(2).count(), 2);
    }

    #[test]
    fn test_store_builds_views_with_its_config() {
        let config = PresentationConfig {
            target_sleep_hours: 8.0,
            sleep_alert_minutes: 90,
            ..Default::default()
        };
        let mut store = DashboardStore::new(config.clone());
        assert_eq!(store.config(), &config);

        // 42h over the week estimates 6h a night
        let metrics = HealthMetrics::new(50_000, 42.0, 70);
        let state = store.apply(&metrics, DataOrigin::Live);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.sleep_deficit_minutes, 120);
        assert!(view.show_sleep_alert);

        let default_state = DashboardStore::default().apply(&metrics, DataOrigin::Live);
        let default_view = default_state.view.as_ref().unwrap();
        assert_eq!(default_view.sleep_deficit_minutes, 60);
        assert!(!default_view.show_sleep_alert);
    }

    #[test]
    fn test_failed_refresh_publishes_demo_state() {
        let mut store = DashboardStore::default();
        let state = store.refresh(&DeniedSource);

        assert!(!state.is_linked);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.origin, DataOrigin::Demo);
        assert_eq!(view.score.total_score, 60);
    }
}
