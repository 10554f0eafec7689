//! Health data sources
//!
//! A data source hands the engine one week of metrics. Two variants exist:
//! a live source that aggregates raw records, and a fixed demo source used
//! when live data is unavailable or fails.

mod demo;
mod live;
pub mod records;

pub use demo::{demo_metrics, DemoSource, DEMO_DAILY_STEPS};
pub use live::LiveSource;
pub use records::{aggregate, HeartRateSample, RecordSet, SleepSession, StepRecord};

use tracing::{debug, warn};

use crate::error::ScoreError;
use crate::types::{DataOrigin, HealthMetrics};

/// Trait for health data sources
pub trait HealthDataSource {
    /// Which kind of data this source produces
    fn origin(&self) -> DataOrigin;

    /// Fetch aggregated metrics for the trailing 7-day window
    fn fetch(&self) -> Result<HealthMetrics, ScoreError>;
}

/// Whether the platform granted access to live health records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

impl Capability {
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }
}

/// Pick the live source when the capability is available and one was built,
/// otherwise the demo source.
pub fn select_source(
    capability: Capability,
    live: Option<LiveSource>,
) -> Box<dyn HealthDataSource> {
    match (capability, live) {
        (Capability::Available, Some(source)) => {
            debug!("using live health data source");
            Box::new(source)
        }
        (capability, _) => {
            debug!(?capability, "using demo health data source");
            Box::new(DemoSource)
        }
    }
}

/// Fetch from `source`, degrading to demo metrics on any error.
pub fn fetch_or_demo(source: &dyn HealthDataSource) -> (HealthMetrics, DataOrigin) {
    match source.fetch() {
        Ok(metrics) => (metrics, source.origin()),
        Err(e) => {
            warn!(error = %e, origin = source.origin().as_str(), "fetch failed, using demo data");
            (demo_metrics(), DataOrigin::Demo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct FailingSource;

    impl HealthDataSource for FailingSource {
        fn origin(&self) -> DataOrigin {
            DataOrigin::Live
        }

        fn fetch(&self) -> Result<HealthMetrics, ScoreError> {
            Err(ScoreError::SourceUnavailable("permission denied".into()))
        }
    }

    fn empty_live() -> LiveSource {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        LiveSource::new(RecordSet::default(), now)
    }

    #[test]
    fn test_select_live_when_available() {
        let source = select_source(Capability::Available, Some(empty_live()));
        assert_eq!(source.origin(), DataOrigin::Live);
    }

    #[test]
    fn test_select_demo_when_unavailable() {
        let source = select_source(Capability::Unavailable, Some(empty_live()));
        assert_eq!(source.origin(), DataOrigin::Demo);

        let source = select_source(Capability::Available, None);
        assert_eq!(source.origin(), DataOrigin::Demo);
    }

    #[test]
    fn test_capability_from_granted() {
        assert_eq!(Capability::from_granted(true), Capability::Available);
        assert_eq!(Capability::from_granted(false), Capability::Unavailable);
    }

    #[test]
    fn test_fetch_or_demo_falls_back() {
        let (metrics, origin) = fetch_or_demo(&FailingSource);
        assert_eq!(origin, DataOrigin::Demo);
        assert_eq!(metrics, demo_metrics());
    }

    #[test]
    fn test_fetch_or_demo_keeps_live_data() {
        let (metrics, origin) = fetch_or_demo(&empty_live());
        assert_eq!(origin, DataOrigin::Live);
        assert_eq!(metrics.total_steps, 0);
        assert_eq!(metrics.average_heart_rate, 0);
    }
}
