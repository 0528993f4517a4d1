//! Piecewise factor formulas
//!
//! Each `*_points` function maps a raw ratio to points. Evaluation wraps
//! them with the neutral-default policy for missing denominators.

use crate::error::ScoreError;
use crate::models::{FactorKind, FlatMetrics, Mode};
use crate::Result;

pub const NEUTRAL_LIQUIDITY: f64 = 50.0;
pub const NEUTRAL_SAVINGS: f64 = 20.0;
pub const NEUTRAL_NET_WORTH: f64 = 50.0;
pub const NEUTRAL_SPENDING: f64 = 50.0;
pub const NEUTRAL_RETIREMENT: f64 = 30.0;
pub const NO_INCOME_EMPLOYMENT: f64 = 20.0;

/// Months of expenses covered by liquid cash.
pub fn liquidity_points(months: f64) -> f64 {
    if months >= 6.0 {
        100.0
    } else if months >= 3.0 {
        70.0 + (months - 3.0) * 10.0
    } else if months >= 1.0 {
        40.0 + (months - 1.0) * 15.0
    } else {
        months * 40.0
    }
}

/// Savings rate in percent of income.
pub fn savings_points(rate: f64) -> f64 {
    if rate >= 30.0 {
        100.0
    } else if rate >= 20.0 {
        80.0 + (rate - 20.0) * 2.0
    } else if rate >= 10.0 {
        60.0 + (rate - 10.0) * 2.0
    } else if rate >= 0.0 {
        20.0 + rate * 4.0
    } else {
        (20.0 + rate * 2.0).max(0.0)
    }
}

/// Debt-to-asset ratio; lower is better.
pub fn net_worth_points(debt_ratio: f64) -> f64 {
    if debt_ratio <= 0.1 {
        100.0
    } else if debt_ratio <= 0.3 {
        80.0 - (debt_ratio - 0.1) * 100.0
    } else if debt_ratio <= 0.5 {
        60.0 - (debt_ratio - 0.3) * 100.0
    } else {
        (40.0 - (debt_ratio - 0.5) * 80.0).max(0.0)
    }
}

/// Savings rate in percent; a deficit is scored on its magnitude.
pub fn spending_points(rate: f64) -> f64 {
    if rate > 0.0 {
        (60.0 + rate * 1.5).min(100.0)
    } else {
        (50.0 - rate.abs() * 2.0).max(10.0)
    }
}

/// EPF balance in multiples of annual income.
pub fn retirement_points(ratio: f64) -> f64 {
    if ratio >= 5.0 {
        100.0
    } else if ratio >= 3.0 {
        70.0 + (ratio - 3.0) * 15.0
    } else if ratio >= 1.0 {
        40.0 + (ratio - 1.0) * 15.0
    } else {
        ratio * 40.0
    }
}

pub fn diversification_points(asset_types: usize) -> f64 {
    let n = asset_types as f64;
    if asset_types >= 5 {
        100.0
    } else if asset_types >= 3 {
        70.0 + (n - 3.0) * 15.0
    } else if asset_types >= 1 {
        40.0 + (n - 1.0) * 15.0
    } else {
        20.0
    }
}

/// Step function of average monthly income. Zero income is handled by
/// the caller.
pub fn employment_points(monthly_income: f64) -> f64 {
    if monthly_income > 50_000.0 {
        90.0
    } else if monthly_income > 25_000.0 {
        70.0
    } else {
        50.0
    }
}

/// Raw (unclamped) points for one factor.
pub fn evaluate(kind: FactorKind, metrics: &FlatMetrics, mode: Mode) -> Result<f64> {
    match kind {
        FactorKind::LiquidityRatio => with_default(
            metrics.months_of_coverage().map(liquidity_points),
            NEUTRAL_LIQUIDITY,
            mode,
            "monthly_expenses is zero; cannot compute emergency fund coverage",
        ),
        FactorKind::SavingsRate => with_default(
            metrics.savings_rate().map(savings_points),
            NEUTRAL_SAVINGS,
            mode,
            "monthly_income is zero; cannot compute savings rate",
        ),
        FactorKind::NetWorthGrowth => with_default(
            metrics.debt_to_asset_ratio().map(net_worth_points),
            NEUTRAL_NET_WORTH,
            mode,
            "total_assets is zero; cannot compute debt-to-asset ratio",
        ),
        FactorKind::SpendingStability => with_default(
            metrics.savings_rate().map(spending_points),
            NEUTRAL_SPENDING,
            mode,
            "monthly_income is zero; cannot assess spending stability",
        ),
        FactorKind::RetirementReadiness => with_default(
            metrics.retirement_ratio().map(retirement_points),
            NEUTRAL_RETIREMENT,
            mode,
            "monthly_income is zero; cannot compute retirement readiness",
        ),
        FactorKind::DiversificationScore => Ok(diversification_points(metrics.asset_types_count)),
        FactorKind::EmploymentStability => with_default(
            (metrics.monthly_income > 0.0).then(|| employment_points(metrics.monthly_income)),
            NO_INCOME_EMPLOYMENT,
            mode,
            "no income detected; cannot assess employment stability",
        ),
    }
}

fn with_default(points: Option<f64>, neutral: f64, mode: Mode, reason: &str) -> Result<f64> {
    match (points, mode) {
        (Some(points), _) => Ok(points),
        (None, Mode::Lenient) => Ok(neutral),
        (None, Mode::Strict) => Err(ScoreError::DataValidation(reason.to_string())),
    }
}
