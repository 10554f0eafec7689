//! Score report encoding
//!
//! This module encodes a dashboard view into a self-describing JSON report
//! carrying producer and provenance metadata alongside the score.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScoreError;
use crate::presentation::DashboardView;
use crate::types::{DataOrigin, HealthMetrics, ScoreResult};
use crate::{PRODUCER_NAME, WELLNESS_VERSION};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Presentation fields of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPresentation {
    pub exercise_status: String,
    pub sleep_status: String,
    pub heart_rate_status: String,
    pub sleep_deficit_minutes: u32,
    pub show_sleep_alert: bool,
    pub has_heart_rate_data: bool,
    pub per_night_sleep_hours: f64,
    pub per_night_sleep_estimated: bool,
}

/// Complete score report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub origin: DataOrigin,
    pub metrics: HealthMetrics,
    pub score: ScoreResult,
    pub presentation: ReportPresentation,
}

/// Encoder for score reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode(&self, view: &DashboardView) -> ScoreReport {
        ScoreReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: WELLNESS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            origin: view.origin,
            metrics: view.metrics.clone(),
            score: view.score,
            presentation: ReportPresentation {
                exercise_status: view.exercise_status.as_str().to_string(),
                sleep_status: view.sleep_status.as_str().to_string(),
                heart_rate_status: view.heart_rate_status.as_str().to_string(),
                sleep_deficit_minutes: view.sleep_deficit_minutes,
                show_sleep_alert: view.show_sleep_alert,
                has_heart_rate_data: view.has_heart_rate_data,
                per_night_sleep_hours: view.per_night_sleep_hours,
                per_night_sleep_estimated: view.per_night_sleep_estimated,
            },
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, view: &DashboardView) -> Result<String, ScoreError> {
        serde_json::to_string_pretty(&self.encode(view))
            .map_err(|e| ScoreError::EncodingError(e.to_string()))
    }
}
