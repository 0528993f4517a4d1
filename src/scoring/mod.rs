//! Scoring engine
//!
//! Pure function from `FlatMetrics` to seven factor scores, a weighted
//! 0-1000 composite, and its grade band. Deterministic for identical input.

pub mod factors;
pub mod recommendations;
pub mod trend;

use tracing::debug;

use crate::models::{FactorKind, FactorScore, FlatMetrics, Grade, Mode};
use crate::Result;

/// Grade band for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub grade: Grade,
    pub category: &'static str,
    pub range: &'static str,
}

/// Composite score with its factor breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub overall_score: u32,
    pub band: ScoreBand,
    pub factors: Vec<FactorScore>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score every factor in declaration order. In strict mode the first
    /// factor missing its denominator aborts the run.
    pub fn score(&self, metrics: &FlatMetrics, mode: Mode) -> Result<Scorecard> {
        let mut scored = Vec::with_capacity(FactorKind::ALL.len());

        for kind in FactorKind::ALL {
            let score = factors::evaluate(kind, metrics, mode)?.clamp(0.0, 100.0);
            let weight = kind.weight();

            debug!(factor = kind.key(), score, "Scored factor");

            scored.push(FactorScore {
                factor: kind.label().to_string(),
                key: kind,
                score,
                weight,
                weighted_contribution: score * weight,
                grade: factor_grade(score),
            });
        }

        let overall_score = composite_score(&scored);

        Ok(Scorecard {
            overall_score,
            band: score_band(overall_score),
            factors: scored,
        })
    }
}

/// `clamp(round(sum(score * weight) * 10), 0, 1000)`
pub fn composite_score(factors: &[FactorScore]) -> u32 {
    let weighted: f64 = factors.iter().map(|f| f.score * f.weight).sum();
    (weighted * 10.0).round().clamp(0.0, 1000.0) as u32
}

pub fn score_band(score: u32) -> ScoreBand {
    let (grade, category, range) = if score >= 900 {
        (Grade::APlus, "Excellent", "900-1000")
    } else if score >= 800 {
        (Grade::A, "Very Good", "800-899")
    } else if score >= 700 {
        (Grade::B, "Good", "700-799")
    } else if score >= 600 {
        (Grade::C, "Fair", "600-699")
    } else if score >= 500 {
        (Grade::D, "Needs Improvement", "500-599")
    } else {
        (Grade::F, "Poor", "0-499")
    };

    ScoreBand {
        grade,
        category,
        range,
    }
}

/// Letter grade for a single 0-100 factor score.
pub fn factor_grade(score: f64) -> Grade {
    if score >= 90.0 {
        Grade::APlus
    } else if score >= 80.0 {
        Grade::A
    } else if score >= 70.0 {
        Grade::B
    } else if score >= 60.0 {
        Grade::C
    } else if score >= 50.0 {
        Grade::D
    } else {
        Grade::F
    }
}
