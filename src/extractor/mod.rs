//! Metrics extraction
//!
//! Reduces a raw snapshot to a `FlatMetrics` record. Missing branches
//! contribute zero; only structural decoding errors (already surfaced by
//! `RawSnapshot` decoding) can fail a run.

pub mod transactions;

use std::collections::BTreeSet;
use tracing::debug;

use crate::config::TransactionWindow;
use crate::models::FlatMetrics;
use crate::snapshot::{money_value, EpfSection, NetWorthSection, RawSnapshot};
use transactions::{windowed_rows, CashFlow};

pub const DEPOSIT_SAVINGS: &str = "DEPOSIT_ACCOUNT_TYPE_SAVINGS";
pub const DEPOSIT_CURRENT: &str = "DEPOSIT_ACCOUNT_TYPE_CURRENT";

/// Bucket an asset label counts toward, besides `total_assets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Investment,
    Liquid,
    Retirement,
    Unclassified,
}

impl AssetClass {
    /// Substring match against the provider's asset vocabulary. First match wins.
    pub fn classify(label: &str) -> Self {
        if label.contains("MUTUAL_FUND")
            || label.contains("SECURITIES")
            || label.contains("EQUITIES")
        {
            AssetClass::Investment
        } else if label.contains("SAVINGS") {
            AssetClass::Liquid
        } else if label.contains("EPF") {
            AssetClass::Retirement
        } else {
            AssetClass::Unclassified
        }
    }
}

/// Stateless extractor; cheap to construct per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsExtractor {
    window: TransactionWindow,
}

impl MetricsExtractor {
    pub fn new(window: TransactionWindow) -> Self {
        Self { window }
    }

    pub fn extract(&self, snapshot: &RawSnapshot) -> FlatMetrics {
        let mut metrics = FlatMetrics::default();

        if let Some(net_worth) = &snapshot.net_worth {
            apply_net_worth(&mut metrics, net_worth);
        }

        if let Some(section) = &snapshot.transactions {
            let banks = windowed_rows(section, &self.window);
            let flow = CashFlow::from_banks(&banks);
            metrics.monthly_income = flow.monthly_income();
            metrics.monthly_expenses = flow.monthly_expenses();
        }

        if let Some(epf) = &snapshot.epf {
            let dedicated = epf_total(epf);
            // Keep the larger estimate; the two sources are never added.
            if dedicated > metrics.epf_balance {
                metrics.epf_balance = dedicated;
            }
        }

        debug!(
            total_assets = metrics.total_assets,
            total_liabilities = metrics.total_liabilities,
            liquid_cash = metrics.liquid_cash,
            monthly_income = metrics.monthly_income,
            monthly_expenses = metrics.monthly_expenses,
            epf_balance = metrics.epf_balance,
            asset_types = metrics.asset_types_count,
            "Extracted financial metrics"
        );

        metrics
    }
}

fn apply_net_worth(metrics: &mut FlatMetrics, net_worth: &NetWorthSection) {
    if let Some(response) = &net_worth.net_worth_response {
        metrics.total_net_worth = money_value(response.total_net_worth_value.as_ref());

        // Distinct label strings, not canonical asset classes.
        let mut labels: BTreeSet<&str> = BTreeSet::new();

        for asset in &response.asset_values {
            let value = asset.amount();
            metrics.total_assets += value;
            labels.insert(asset.net_worth_attribute.as_str());

            match AssetClass::classify(&asset.net_worth_attribute) {
                AssetClass::Investment => metrics.investment_value += value,
                AssetClass::Liquid => metrics.liquid_cash += value,
                AssetClass::Retirement => metrics.epf_balance += value,
                AssetClass::Unclassified => {}
            }
        }

        metrics.asset_types_count = labels.len();

        metrics.total_liabilities = response
            .liability_values
            .iter()
            .map(|liability| liability.amount())
            .sum();
    }

    if let Some(bulk) = &net_worth.account_details_bulk_response {
        metrics.account_count = bulk.account_details_map.len();

        for account in bulk.account_details_map.values() {
            match account.deposit_type() {
                Some(DEPOSIT_SAVINGS) => {
                    let balance = account.deposit_balance();
                    metrics.savings_accounts_balance += balance;
                    metrics.liquid_cash += balance;
                }
                Some(DEPOSIT_CURRENT) => {
                    let balance = account.deposit_balance();
                    metrics.current_accounts_balance += balance;
                    metrics.liquid_cash += balance;
                }
                Some(_) => {}
                None => metrics.investment_value += account.holdings_value(),
            }
        }
    }
}

fn epf_total(epf: &EpfSection) -> f64 {
    epf.uan_accounts.iter().map(|account| account.pf_balance()).sum()
}
