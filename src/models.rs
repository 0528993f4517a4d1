//! Core data models for the financial health score

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;

//
// ================= Enums =================
//

/// Validation policy for a pipeline run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Missing denominators fall back to neutral factor scores.
    #[default]
    Lenient,
    /// Missing critical data is a `DataValidation` error.
    Strict,
}

impl Mode {
    pub fn is_strict(self) -> bool {
        self == Mode::Strict
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
}

/// The seven scoring factors, in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    LiquidityRatio,
    SavingsRate,
    NetWorthGrowth,
    SpendingStability,
    RetirementReadiness,
    DiversificationScore,
    EmploymentStability,
}

impl FactorKind {
    pub const ALL: [FactorKind; 7] = [
        FactorKind::LiquidityRatio,
        FactorKind::SavingsRate,
        FactorKind::NetWorthGrowth,
        FactorKind::SpendingStability,
        FactorKind::RetirementReadiness,
        FactorKind::DiversificationScore,
        FactorKind::EmploymentStability,
    ];

    /// Fixed composite weight. The seven weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            FactorKind::LiquidityRatio => 0.25,
            FactorKind::SavingsRate => 0.20,
            FactorKind::NetWorthGrowth => 0.15,
            FactorKind::SpendingStability => 0.15,
            FactorKind::RetirementReadiness => 0.10,
            FactorKind::DiversificationScore => 0.10,
            FactorKind::EmploymentStability => 0.05,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            FactorKind::LiquidityRatio => "liquidity_ratio",
            FactorKind::SavingsRate => "savings_rate",
            FactorKind::NetWorthGrowth => "net_worth_growth",
            FactorKind::SpendingStability => "spending_stability",
            FactorKind::RetirementReadiness => "retirement_readiness",
            FactorKind::DiversificationScore => "diversification_score",
            FactorKind::EmploymentStability => "employment_stability",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FactorKind::LiquidityRatio => "Liquidity Ratio",
            FactorKind::SavingsRate => "Savings Rate",
            FactorKind::NetWorthGrowth => "Net Worth Growth",
            FactorKind::SpendingStability => "Spending Stability",
            FactorKind::RetirementReadiness => "Retirement Readiness",
            FactorKind::DiversificationScore => "Diversification Score",
            FactorKind::EmploymentStability => "Employment Stability",
        }
    }
}

//
// ================= Metrics =================
//

/// Flat metrics record extracted from a raw snapshot.
///
/// Every field defaults to zero when the underlying data is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatMetrics {
    pub total_net_worth: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub liquid_cash: f64,
    pub investment_value: f64,
    pub epf_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub asset_types_count: usize,
    pub account_count: usize,
    pub savings_accounts_balance: f64,
    pub current_accounts_balance: f64,
}

impl FlatMetrics {
    /// Months of expenses covered by liquid cash. `None` without expense data.
    pub fn months_of_coverage(&self) -> Option<f64> {
        (self.monthly_expenses > 0.0).then(|| self.liquid_cash / self.monthly_expenses)
    }

    /// Percentage of income left after expenses. Negative on a deficit.
    pub fn savings_rate(&self) -> Option<f64> {
        (self.monthly_income > 0.0).then(|| {
            (self.monthly_income - self.monthly_expenses) / self.monthly_income * 100.0
        })
    }

    pub fn debt_to_asset_ratio(&self) -> Option<f64> {
        (self.total_assets > 0.0).then(|| self.total_liabilities / self.total_assets)
    }

    /// EPF balance in multiples of annual income.
    pub fn retirement_ratio(&self) -> Option<f64> {
        (self.monthly_income > 0.0).then(|| self.epf_balance / (self.monthly_income * 12.0))
    }
}

//
// ================= Report =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorScore {
    /// Display label, e.g. "Liquidity Ratio".
    pub factor: String,
    pub key: FactorKind,
    pub score: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub factor: FactorKind,
    pub category: String,
    pub priority: Priority,
    pub current_status: String,
    pub target: String,
    pub action: String,
    pub impact: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekScore {
    pub week: String,
    pub score: u32,
    pub change: i64,
    pub health_indicator: String,
}

/// Pipeline output. Built once per run and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreReport {
    pub overall_score: u32,
    pub grade: Grade,
    pub category: String,
    pub score_range: String,
    pub factor_breakdown: Vec<FactorScore>,
    pub recommendations: Vec<Recommendation>,
    pub week_wise_analysis: Vec<WeekScore>,
    pub parsed_metrics: FlatMetrics,
    pub mode: Mode,
    pub snapshot_fingerprint: String,
}

impl ScoreReport {
    pub fn factor(&self, kind: FactorKind) -> Option<&FactorScore> {
        self.factor_breakdown.iter().find(|f| f.key == kind)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Lenient => "lenient",
            Mode::Strict => "strict",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Mode {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Mode::Lenient),
            "strict" => Ok(Mode::Strict),
            other => Err(ScoreError::Config(format!(
                "Unknown scoring mode '{}', expected 'lenient' or 'strict'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = FactorKind::ALL.iter().map(|k| k.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratios_absent_without_denominators() {
        let metrics = FlatMetrics::default();
        assert_eq!(metrics.months_of_coverage(), None);
        assert_eq!(metrics.savings_rate(), None);
        assert_eq!(metrics.debt_to_asset_ratio(), None);
        assert_eq!(metrics.retirement_ratio(), None);
    }

    #[test]
    fn test_savings_rate_negative_on_deficit() {
        let metrics = FlatMetrics {
            monthly_income: 1000.0,
            monthly_expenses: 1500.0,
            ..Default::default()
        };
        assert_eq!(metrics.savings_rate(), Some(-50.0));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Strict".parse::<Mode>().unwrap(), Mode::Strict);
        assert_eq!(" lenient ".parse::<Mode>().unwrap(), Mode::Lenient);
        assert!("paranoid".parse::<Mode>().is_err());
    }

    #[test]
    fn test_grade_serializes_with_plus() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(
            serde_json::to_string(&FactorKind::DiversificationScore).unwrap(),
            "\"diversification_score\""
        );
    }
}
