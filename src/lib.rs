//! Financial Health Score
//!
//! Deterministic reduction of a raw financial-account snapshot (net worth,
//! bank transactions, EPF balances) into a 0-1000 health score:
//! - Extracts a flat metrics record from the provider's nested JSON
//! - Scores seven independent factors with fixed piecewise rules
//! - Combines them with fixed weights into a graded composite
//! - Emits recommendations for every factor scoring below 70
//!
//! PIPELINE:
//! RAW SNAPSHOT → METRICS → FACTORS → COMPOSITE → RECOMMENDATIONS
//!
//! The pipeline is pure: no I/O, no shared state, safe to call from any
//! number of threads.

pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod models;
pub mod scoring;
pub mod snapshot;
pub mod summary;
pub mod validation;

pub use error::{Result, ScoreError};

// Re-export common types
pub use config::{EngineConfig, TransactionWindow};
pub use engine::HealthScoreEngine;
pub use models::*;
pub use snapshot::RawSnapshot;
pub use summary::SnapshotSummary;

/// Score a raw snapshot with the default transaction window.
pub fn compute_score(raw: &serde_json::Value, mode: Mode) -> Result<ScoreReport> {
    HealthScoreEngine::default().score_with_mode(raw, mode)
}
