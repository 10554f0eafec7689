//! Live data source backed by platform records

use chrono::{DateTime, Utc};

use crate::error::ScoreError;
use crate::types::{DataOrigin, HealthMetrics};

use super::records::{aggregate, RecordSet};
use super::HealthDataSource;

/// Source that aggregates records read from the platform
#[derive(Debug, Clone)]
pub struct LiveSource {
    records: RecordSet,
    now: DateTime<Utc>,
}

impl LiveSource {
    /// Create a source over `records`, with the window ending at `now`
    pub fn new(records: RecordSet, now: DateTime<Utc>) -> Self {
        Self { records, now }
    }

    /// Parse a record set document; the window ends at `now`
    pub fn from_json(json: &str, now: DateTime<Utc>) -> Result<Self, ScoreError> {
        Ok(Self::new(RecordSet::from_json(json)?, now))
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }
}

impl HealthDataSource for LiveSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Live
    }

    fn fetch(&self) -> Result<HealthMetrics, ScoreError> {
        self.records.validate()?;
        let metrics = aggregate(&self.records, self.now);
        metrics.validate()?;
        Ok(metrics)
    }
}
