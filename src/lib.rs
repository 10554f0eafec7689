//! Wellness Score - composite health score for a week of wearable data
//!
//! The crate turns three weekly aggregates (steps, sleep hours, average heart
//! rate) into a bounded 0-100 score through a deterministic engine, and builds
//! the dashboard fields shown next to it: data source → metrics → score →
//! view → state snapshot / report.
//!
//! ## Modules
//!
//! - **Engine**: Pure scoring and presentation helpers
//! - **Sources**: Live record aggregation and a fixed demo source
//! - **State**: Immutable dashboard snapshots pushed to subscribers

pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod presentation;
pub mod source;
pub mod state;
pub mod types;

// FFI bindings for C interop (on by default for cdylib/staticlib builds)
#[cfg(feature = "ffi")]
pub mod ffi;

pub use config::PresentationConfig;
pub use engine::compute_score;
pub use error::ScoreError;
pub use presentation::{build_view, DashboardView};
pub use source::{fetch_or_demo, select_source, Capability, HealthDataSource};
pub use state::{DashboardState, DashboardStore};
pub use types::{DataOrigin, HealthMetrics, ScoreResult};

/// Crate version embedded in all reports
pub const WELLNESS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "wellness-score";
