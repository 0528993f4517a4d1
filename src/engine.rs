//! Scoring pipeline
//!
//! RAW SNAPSHOT → EXTRACT → VALIDATE (strict) → SCORE → RECOMMEND → REPORT

use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::extractor::MetricsExtractor;
use crate::models::{Mode, ScoreReport};
use crate::scoring::{recommendations, trend, ScoringEngine};
use crate::snapshot::RawSnapshot;
use crate::summary::{summarize_snapshot, SnapshotSummary};
use crate::validation::{create_strict_validator, SnapshotValidator};
use crate::Result;

/// Runs the full pipeline. Holds no per-run state, so one instance can
/// serve any number of threads.
pub struct HealthScoreEngine {
    config: EngineConfig,
    extractor: MetricsExtractor,
    scorer: ScoringEngine,
    validator: SnapshotValidator,
}

impl HealthScoreEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            extractor: MetricsExtractor::new(config.window),
            scorer: ScoringEngine::new(),
            validator: create_strict_validator(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score with the configured mode.
    pub fn score(&self, raw: &Value) -> Result<ScoreReport> {
        self.score_with_mode(raw, self.config.mode)
    }

    pub fn score_with_mode(&self, raw: &Value, mode: Mode) -> Result<ScoreReport> {
        let snapshot = RawSnapshot::from_value(raw)?;
        self.score_snapshot(&snapshot, mode)
    }

    pub fn score_snapshot(&self, snapshot: &RawSnapshot, mode: Mode) -> Result<ScoreReport> {
        let start = Instant::now();

        let metrics = self.extractor.extract(snapshot);

        if mode.is_strict() {
            self.validator.validate(snapshot, &metrics).into_result()?;
        }

        let card = self.scorer.score(&metrics, mode)?;
        let recommendations = recommendations::generate(&card.factors, &metrics);

        debug!(
            recommendation_count = recommendations.len(),
            "Generated recommendations"
        );

        let report = ScoreReport {
            overall_score: card.overall_score,
            grade: card.band.grade,
            category: card.band.category.to_string(),
            score_range: card.band.range.to_string(),
            week_wise_analysis: trend::week_wise_analysis(card.overall_score),
            factor_breakdown: card.factors,
            recommendations,
            parsed_metrics: metrics,
            mode,
            snapshot_fingerprint: snapshot.fingerprint(),
        };

        info!(
            overall_score = report.overall_score,
            grade = %report.grade,
            mode = %mode,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Financial health score computed"
        );

        Ok(report)
    }

    pub fn summarize(&self, raw: &Value) -> Result<SnapshotSummary> {
        let snapshot = RawSnapshot::from_value(raw)?;
        Ok(summarize_snapshot(&snapshot, &self.config.window))
    }
}

impl Default for HealthScoreEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FactorKind, Grade, Priority};
    use serde_json::json;

    /// Income 60k/month, expenses 45k/month, 90k liquid, 500k assets,
    /// 50k liabilities, 300k EPF, two asset labels.
    fn reference_snapshot() -> Value {
        json!({
            "net_worth": {
                "netWorthResponse": {
                    "totalNetWorthValue": {"currencyCode": "INR", "units": "450000"},
                    "assetValues": [
                        {"netWorthAttribute": "ASSET_TYPE_MUTUAL_FUND", "value": {"currencyCode": "INR", "units": "410000"}},
                        {"netWorthAttribute": "ASSET_TYPE_SAVINGS_ACCOUNTS", "value": {"currencyCode": "INR", "units": "90000"}}
                    ],
                    "liabilityValues": [
                        {"netWorthAttribute": "LIABILITY_TYPE_CREDIT_CARD", "value": {"currencyCode": "INR", "units": "50000"}}
                    ]
                }
            },
            "transactions": {
                "bankTransactions": [{
                    "bank": "HDFC Bank",
                    "txns": [
                        ["60000", "SALARY CREDIT", "2025-06-01", 1, "NEFT", "160000"],
                        ["45000", "MONTHLY SPEND", "2025-06-15", 2, "UPI", "115000"],
                        ["60000", "SALARY CREDIT", "2025-07-01", 1, "NEFT", "175000"],
                        ["45000", "MONTHLY SPEND", "2025-07-15", 2, "UPI", "130000"],
                        ["not-a-number", "CORRUPT ROW", "2025-07-20", 2, "UPI", ""]
                    ]
                }]
            },
            "epf": {
                "uanAccounts": [{
                    "rawDetails": {"overall_pf_balance": {"current_pf_balance": "300000", "pension_balance": "50000"}}
                }]
            }
        })
    }

    #[test]
    fn test_reference_scenario_report() {
        let report = HealthScoreEngine::default()
            .score_with_mode(&reference_snapshot(), Mode::Lenient)
            .unwrap();

        assert_eq!(report.parsed_metrics.monthly_income, 60000.0);
        assert_eq!(report.parsed_metrics.monthly_expenses, 45000.0);
        assert_eq!(report.parsed_metrics.liquid_cash, 90000.0);
        assert_eq!(report.parsed_metrics.epf_balance, 300000.0);
        assert_eq!(report.parsed_metrics.asset_types_count, 2);

        assert_eq!(report.overall_score, 730);
        assert_eq!(report.grade, Grade::B);
        assert_eq!(report.category, "Good");
        assert_eq!(report.score_range, "700-799");
        assert_eq!(report.factor_breakdown.len(), 7);

        let liquidity = report.factor(FactorKind::LiquidityRatio).unwrap();
        assert_eq!(liquidity.score, 55.0);
        let savings = report.factor(FactorKind::SavingsRate).unwrap();
        assert!(savings.score > 80.0 && savings.score < 100.0);
        assert_eq!(report.factor(FactorKind::NetWorthGrowth).unwrap().score, 100.0);

        let categories: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(
            categories,
            vec!["Emergency Fund", "Retirement Planning", "Investment Diversification"]
        );
        assert_eq!(report.recommendations[0].priority, Priority::High);
        assert_eq!(report.recommendations[1].priority, Priority::Medium);
    }

    #[test]
    fn test_recommendations_cover_exactly_low_factors() {
        let report = HealthScoreEngine::default()
            .score_with_mode(&reference_snapshot(), Mode::Lenient)
            .unwrap();

        for factor in &report.factor_breakdown {
            let count = report
                .recommendations
                .iter()
                .filter(|r| r.factor == factor.key)
                .count();
            let expected = usize::from(factor.score < 70.0);
            assert_eq!(count, expected, "{:?}", factor.key);
        }
    }

    #[test]
    fn test_empty_snapshot_lenient_uses_neutral_defaults() {
        let report = HealthScoreEngine::default()
            .score_with_mode(&json!({}), Mode::Lenient)
            .unwrap();

        let scores: Vec<f64> = report.factor_breakdown.iter().map(|f| f.score).collect();
        assert_eq!(scores, vec![50.0, 20.0, 50.0, 50.0, 30.0, 20.0, 20.0]);
        assert_eq!(report.overall_score, 375);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.category, "Poor");
        assert_eq!(report.recommendations.len(), 7);
    }

    #[test]
    fn test_empty_snapshot_strict_is_rejected() {
        let err = HealthScoreEngine::default()
            .score_with_mode(&json!({}), Mode::Strict)
            .unwrap_err();
        assert!(err.is_data_validation());
    }

    #[test]
    fn test_strict_accepts_complete_snapshot() {
        let lenient = HealthScoreEngine::default()
            .score_with_mode(&reference_snapshot(), Mode::Lenient)
            .unwrap();
        let strict = HealthScoreEngine::default()
            .score_with_mode(&reference_snapshot(), Mode::Strict)
            .unwrap();

        assert_eq!(strict.overall_score, lenient.overall_score);
        assert_eq!(strict.mode, Mode::Strict);
    }

    #[test]
    fn test_strict_rejects_missing_expenses() {
        let mut snapshot = reference_snapshot();
        snapshot["transactions"]["bankTransactions"][0]["txns"] = json!([
            ["60000", "SALARY CREDIT", "2025-07-01", 1]
        ]);

        let lenient = HealthScoreEngine::default()
            .score_with_mode(&snapshot, Mode::Lenient)
            .unwrap();
        assert_eq!(lenient.factor(FactorKind::LiquidityRatio).unwrap().score, 50.0);

        let err = HealthScoreEngine::default()
            .score_with_mode(&snapshot, Mode::Strict)
            .unwrap_err();
        assert!(err.is_data_validation());
        assert!(err.to_string().contains("monthly_expenses"));
    }

    #[test]
    fn test_strict_rejects_zero_income_at_savings_rate() {
        let mut snapshot = reference_snapshot();
        snapshot["transactions"]["bankTransactions"][0]["txns"] = json!([
            ["45000", "MONTHLY SPEND", "2025-07-15", 2]
        ]);

        let err = HealthScoreEngine::default()
            .score_with_mode(&snapshot, Mode::Strict)
            .unwrap_err();
        assert!(err.is_data_validation());
        // Savings rate is the first income-based factor evaluated
        assert!(err.to_string().contains("cannot compute savings rate"), "{}", err);

        let lenient = HealthScoreEngine::default()
            .score_with_mode(&snapshot, Mode::Lenient)
            .unwrap();
        assert_eq!(lenient.factor(FactorKind::EmploymentStability).unwrap().score, 20.0);
    }

    #[test]
    fn test_structural_errors_propagate() {
        let err = HealthScoreEngine::default()
            .score_with_mode(
                &json!({"net_worth": {"netWorthResponse": {"totalNetWorthValue": {"units": [1]}}}}),
                Mode::Lenient,
            )
            .unwrap_err();
        assert!(!err.is_data_validation());
    }

    #[test]
    fn test_identical_input_yields_identical_json() {
        let engine = HealthScoreEngine::default();
        let first = serde_json::to_string(&engine.score(&reference_snapshot()).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.score(&reference_snapshot()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_field_names() {
        let report = HealthScoreEngine::default().score(&reference_snapshot()).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        for key in ["overall_score", "grade", "category", "factor_breakdown", "recommendations"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        let factor = &value["factor_breakdown"][0];
        for key in ["factor", "score", "weight", "grade"] {
            assert!(factor.get(key).is_some(), "missing factor.{}", key);
        }
        assert_eq!(factor["factor"], "Liquidity Ratio");
        assert_eq!(value["grade"], "B");
    }

    #[test]
    fn test_summarize_uses_configured_window() {
        let summary = HealthScoreEngine::default().summarize(&reference_snapshot()).unwrap();
        let tx = summary.transactions.unwrap();
        assert_eq!(tx.banks[0].transaction_count, 4);
        assert_eq!(tx.average_monthly_income, 60000.0);
        assert_eq!(summary.epf.unwrap().pension_balance, 50000.0);
    }
}
