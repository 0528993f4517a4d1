//! Strict-mode snapshot validation
//!
//! Rules-based checks run before scoring when the caller needs fresh,
//! complete data. Every failing rule is reported, not just the first.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScoreError;
use crate::models::FlatMetrics;
use crate::snapshot::RawSnapshot;
use crate::Result;

/// Trait for validation rules
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, snapshot: &RawSnapshot, metrics: &FlatMetrics) -> RuleOutcome;
}

pub struct RuleOutcome {
    pub passed: bool,
    pub details: String,
}

impl RuleOutcome {
    fn pass(details: impl Into<String>) -> Self {
        Self {
            passed: true,
            details: details.into(),
        }
    }

    fn fail(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub rule_name: String,
    pub passed: bool,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub checks: Vec<ValidationCheck>,
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Convert a failed report into a `DataValidation` error.
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(ScoreError::DataValidation(self.issues.join("; ")))
        }
    }
}

/// Validator that applies a rule set
pub struct SnapshotValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl SnapshotValidator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn validate(&self, snapshot: &RawSnapshot, metrics: &FlatMetrics) -> ValidationReport {
        let mut checks = Vec::with_capacity(self.rules.len());
        let mut issues = Vec::new();

        for rule in &self.rules {
            let outcome = rule.check(snapshot, metrics);

            if !outcome.passed {
                warn!(rule = rule.name(), details = %outcome.details, "Validation rule failed");
                issues.push(format!("{}: {}", rule.name(), outcome.details));
            }

            checks.push(ValidationCheck {
                rule_name: rule.name().to_string(),
                passed: outcome.passed,
                details: outcome.details,
            });
        }

        let valid = issues.is_empty();

        info!(rule_count = self.rules.len(), valid, "Snapshot validation completed");

        ValidationReport {
            valid,
            checks,
            issues,
        }
    }
}

impl Default for SnapshotValidator {
    fn default() -> Self {
        Self::new()
    }
}

//
// ========== Rules ==========
//

/// Rule: a `net_worth` section with a `netWorthResponse`
pub struct NetWorthSectionRule;

impl ValidationRule for NetWorthSectionRule {
    fn name(&self) -> &'static str {
        "net_worth_section"
    }

    fn check(&self, snapshot: &RawSnapshot, _metrics: &FlatMetrics) -> RuleOutcome {
        match &snapshot.net_worth {
            None => RuleOutcome::fail("missing required section 'net_worth'"),
            Some(section) if section.net_worth_response.is_none() => {
                RuleOutcome::fail("net_worth section is missing 'netWorthResponse'")
            }
            Some(_) => RuleOutcome::pass("net_worth section present"),
        }
    }
}

/// Rule: a `transactions` section with at least one bank
pub struct TransactionSectionRule;

impl ValidationRule for TransactionSectionRule {
    fn name(&self) -> &'static str {
        "transactions_section"
    }

    fn check(&self, snapshot: &RawSnapshot, _metrics: &FlatMetrics) -> RuleOutcome {
        match &snapshot.transactions {
            None => RuleOutcome::fail("missing required section 'transactions'"),
            Some(section) if section.bank_transactions.is_empty() => {
                RuleOutcome::fail("transactions section has no 'bankTransactions'")
            }
            Some(section) => RuleOutcome::pass(format!(
                "{} bank(s) with transactions",
                section.bank_transactions.len()
            )),
        }
    }
}

/// Rule: income and expenses must not both extract to zero
pub struct CashFlowPresenceRule;

impl ValidationRule for CashFlowPresenceRule {
    fn name(&self) -> &'static str {
        "cash_flow_presence"
    }

    fn check(&self, _snapshot: &RawSnapshot, metrics: &FlatMetrics) -> RuleOutcome {
        if metrics.monthly_income <= 0.0 && metrics.monthly_expenses <= 0.0 {
            RuleOutcome::fail("monthly_income and monthly_expenses are both zero")
        } else {
            RuleOutcome::pass("income or expense data present")
        }
    }
}

/// Rule: assets and liabilities must not both be zero
pub struct BalanceSheetPresenceRule;

impl ValidationRule for BalanceSheetPresenceRule {
    fn name(&self) -> &'static str {
        "balance_sheet_presence"
    }

    fn check(&self, _snapshot: &RawSnapshot, metrics: &FlatMetrics) -> RuleOutcome {
        if metrics.total_assets <= 0.0 && metrics.total_liabilities <= 0.0 {
            RuleOutcome::fail("total_assets and total_liabilities are both zero")
        } else {
            RuleOutcome::pass("asset or liability data present")
        }
    }
}

/// Create a validator with the strict-mode rule set
pub fn create_strict_validator() -> SnapshotValidator {
    let mut validator = SnapshotValidator::new();
    validator.add_rule(Box::new(NetWorthSectionRule));
    validator.add_rule(Box::new(TransactionSectionRule));
    validator.add_rule(Box::new(CashFlowPresenceRule));
    validator.add_rule(Box::new(BalanceSheetPresenceRule));
    validator
}

//
// ================= Tests =================
//
