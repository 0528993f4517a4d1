//! Recommendation generation
//!
//! One recommendation per factor scoring below the threshold, in factor
//! declaration order.

use crate::models::{FactorKind, FactorScore, FlatMetrics, Priority, Recommendation};

/// Factors scoring below this get a recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 70.0;

/// Factors weighted at or above this are high priority.
const HIGH_PRIORITY_WEIGHT: f64 = 0.15;

pub fn generate(factors: &[FactorScore], metrics: &FlatMetrics) -> Vec<Recommendation> {
    FactorKind::ALL
        .iter()
        .filter_map(|kind| factors.iter().find(|f| f.key == *kind))
        .filter(|factor| factor.score < RECOMMENDATION_THRESHOLD)
        .map(|factor| recommend(factor.key, metrics))
        .collect()
}

fn priority(weight: f64) -> Priority {
    if weight >= HIGH_PRIORITY_WEIGHT {
        Priority::High
    } else {
        Priority::Medium
    }
}

fn impact(weight: f64) -> &'static str {
    if weight >= 0.25 {
        "+50-100 points"
    } else if weight >= 0.20 {
        "+40-80 points"
    } else if weight >= 0.15 {
        "+30-60 points"
    } else if weight >= 0.10 {
        "+20-40 points"
    } else {
        "+10-20 points"
    }
}

fn recommend(kind: FactorKind, m: &FlatMetrics) -> Recommendation {
    let (category, current_status, target, action, timeline) = match kind {
        FactorKind::LiquidityRatio => {
            let months = m.liquid_cash / m.monthly_expenses.max(1.0);
            let shortfall = (6.0 * m.monthly_expenses - m.liquid_cash).max(0.0);
            (
                "Emergency Fund",
                format!("{:.1} months coverage", months),
                "6 months of expenses".to_string(),
                format!("Increase emergency fund by ₹{}", format_rupees(shortfall)),
                "3-6 months",
            )
        }
        FactorKind::SavingsRate => {
            let rate = (m.monthly_income - m.monthly_expenses) / m.monthly_income.max(1.0) * 100.0;
            let cut = (m.monthly_expenses - 0.8 * m.monthly_income).max(0.0);
            (
                "Savings Rate",
                format!("{:.1}% savings rate", rate),
                "20% savings rate".to_string(),
                format!("Reduce expenses by ₹{}/month", format_rupees(cut)),
                "1-3 months",
            )
        }
        FactorKind::NetWorthGrowth => {
            let status = match m.debt_to_asset_ratio() {
                Some(ratio) => format!("{:.1}% debt-to-asset ratio", ratio * 100.0),
                None => "No recorded assets".to_string(),
            };
            let paydown = (m.total_liabilities - 0.1 * m.total_assets).max(0.0);
            (
                "Debt Management",
                status,
                "Liabilities under 10% of assets".to_string(),
                format!("Pay down ₹{} of outstanding liabilities", format_rupees(paydown)),
                "6-12 months",
            )
        }
        FactorKind::SpendingStability => {
            let share = m.monthly_expenses / m.monthly_income.max(1.0) * 100.0;
            (
                "Spending Control",
                format!("Spending {:.1}% of monthly income", share),
                "Consistent monthly surplus".to_string(),
                format!(
                    "Cap monthly spending at ₹{} and track recurring debits",
                    format_rupees(0.8 * m.monthly_income)
                ),
                "1-3 months",
            )
        }
        FactorKind::RetirementReadiness => (
            "Retirement Planning",
            format!("₹{} EPF balance", format_rupees(m.epf_balance)),
            format!("₹{} (3x annual income)", format_rupees(m.monthly_income * 12.0 * 3.0)),
            "Increase EPF/NPS contributions or start SIP".to_string(),
            "6-12 months",
        ),
        FactorKind::DiversificationScore => (
            "Investment Diversification",
            format!("{} asset types", m.asset_types_count),
            "5+ asset classes".to_string(),
            "Add debt funds, international equity, or REITs".to_string(),
            "3-6 months",
        ),
        FactorKind::EmploymentStability => (
            "Income Stability",
            format!("₹{}/month average income", format_rupees(m.monthly_income)),
            "Regular monthly income above ₹25,000".to_string(),
            "Build a steady primary income or add a secondary income stream".to_string(),
            "6-12 months",
        ),
    };

    Recommendation {
        factor: kind,
        category: category.to_string(),
        priority: priority(kind.weight()),
        current_status,
        target,
        action,
        impact: impact(kind.weight()).to_string(),
        timeline: timeline.to_string(),
    }
}

/// Whole rupees with comma thousands separators, e.g. `1,234,567`.
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    fn factor(kind: FactorKind, score: f64) -> FactorScore {
        FactorScore {
            factor: kind.label().to_string(),
            key: kind,
            score,
            weight: kind.weight(),
            weighted_contribution: score * kind.weight(),
            grade: Grade::C,
        }
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(0.0), "0");
        assert_eq!(format_rupees(999.4), "999");
        assert_eq!(format_rupees(1000.0), "1,000");
        assert_eq!(format_rupees(180000.0), "180,000");
        assert_eq!(format_rupees(2160000.0), "2,160,000");
        assert_eq!(format_rupees(-12345.0), "-12,345");
    }

    #[test]
    fn test_one_recommendation_per_low_factor() {
        let factors: Vec<FactorScore> = FactorKind::ALL
            .iter()
            .map(|kind| factor(*kind, 69.9))
            .collect();

        let recs = generate(&factors, &FlatMetrics::default());
        assert_eq!(recs.len(), 7);

        let order: Vec<FactorKind> = recs.iter().map(|r| r.factor).collect();
        assert_eq!(order, FactorKind::ALL.to_vec());
    }

    #[test]
    fn test_no_recommendation_at_threshold() {
        let factors = vec![
            factor(FactorKind::LiquidityRatio, 70.0),
            factor(FactorKind::SavingsRate, 100.0),
        ];
        assert!(generate(&factors, &FlatMetrics::default()).is_empty());
    }

    #[test]
    fn test_order_follows_declaration_not_severity() {
        let factors = vec![
            factor(FactorKind::LiquidityRatio, 65.0),
            factor(FactorKind::DiversificationScore, 5.0),
            factor(FactorKind::RetirementReadiness, 40.0),
        ];
        let recs = generate(&factors, &FlatMetrics::default());
        let order: Vec<FactorKind> = recs.iter().map(|r| r.factor).collect();
        assert_eq!(
            order,
            vec![
                FactorKind::LiquidityRatio,
                FactorKind::RetirementReadiness,
                FactorKind::DiversificationScore
            ]
        );
    }

    #[test]
    fn test_priority_and_impact_follow_weight() {
        let factors: Vec<FactorScore> = FactorKind::ALL
            .iter()
            .map(|kind| factor(*kind, 0.0))
            .collect();
        let recs = generate(&factors, &FlatMetrics::default());

        let priorities: Vec<Priority> = recs.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![
                Priority::High,
                Priority::High,
                Priority::High,
                Priority::High,
                Priority::Medium,
                Priority::Medium,
                Priority::Medium
            ]
        );
        assert_eq!(recs[0].impact, "+50-100 points");
        assert_eq!(recs[1].impact, "+40-80 points");
        assert_eq!(recs[2].impact, "+30-60 points");
        assert_eq!(recs[4].impact, "+20-40 points");
        assert_eq!(recs[6].impact, "+10-20 points");
    }

    #[test]
    fn test_status_text_uses_raw_metrics() {
        let metrics = FlatMetrics {
            liquid_cash: 90_000.0,
            monthly_income: 60_000.0,
            monthly_expenses: 45_000.0,
            epf_balance: 300_000.0,
            asset_types_count: 2,
            ..Default::default()
        };
        let factors = vec![
            factor(FactorKind::LiquidityRatio, 55.0),
            factor(FactorKind::RetirementReadiness, 16.7),
            factor(FactorKind::DiversificationScore, 55.0),
        ];
        let recs = generate(&factors, &metrics);

        assert_eq!(recs[0].category, "Emergency Fund");
        assert_eq!(recs[0].current_status, "2.0 months coverage");
        assert_eq!(recs[0].action, "Increase emergency fund by ₹180,000");

        assert_eq!(recs[1].current_status, "₹300,000 EPF balance");
        assert_eq!(recs[1].target, "₹2,160,000 (3x annual income)");

        assert_eq!(recs[2].current_status, "2 asset types");
        assert_eq!(recs[2].target, "5+ asset classes");
    }

    #[test]
    fn test_missing_data_does_not_divide_by_zero() {
        let factors = vec![
            factor(FactorKind::LiquidityRatio, 50.0),
            factor(FactorKind::NetWorthGrowth, 50.0),
        ];
        let recs = generate(&factors, &FlatMetrics::default());
        assert_eq!(recs[0].current_status, "0.0 months coverage");
        assert_eq!(recs[1].current_status, "No recorded assets");
    }
}
