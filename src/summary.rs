//! Condensed snapshot summary
//!
//! A compact, JSON-friendly digest of a snapshot for consumers with tight
//! size budgets (e.g. language-model prompts). Independent of scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::TransactionWindow;
use crate::extractor::transactions::{windowed_rows, BankRows, CashFlow, Direction};
use crate::extractor::{DEPOSIT_CURRENT, DEPOSIT_SAVINGS};
use crate::snapshot::{
    amount, money_value, EpfSection, MfSchemeAnalytics, NetWorthSection, RawSnapshot,
    TransactionSection,
};

const RECENT_TRANSACTIONS_PER_BANK: usize = 10;
const NARRATION_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotSummary {
    pub net_worth: Option<NetWorthSummary>,
    pub transactions: Option<TransactionSummary>,
    pub epf: Option<EpfSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetWorthSummary {
    pub total_net_worth: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub asset_breakdown: BTreeMap<String, f64>,
    pub liability_breakdown: BTreeMap<String, f64>,
    pub accounts: AccountSummary,
    pub mutual_funds: Option<MutualFundSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountSummary {
    pub total_accounts: usize,
    pub savings_accounts: AccountBucket,
    pub current_accounts: AccountBucket,
    pub investment_accounts: AccountBucket,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountBucket {
    pub count: usize,
    pub total: f64,
}

impl AccountBucket {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MutualFundSummary {
    pub total_current_value: f64,
    pub total_invested_value: f64,
    pub total_returns: f64,
    pub return_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionSummary {
    pub banks: Vec<BankSummary>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub net_monthly_cashflow: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BankSummary {
    pub bank: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_cashflow: f64,
    pub transaction_count: usize,
    pub recent_transactions: Vec<TransactionDigest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDigest {
    pub amount: f64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub narration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EpfSummary {
    pub total_epf_balance: f64,
    pub pension_balance: f64,
    pub employers: Vec<EmployerBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployerBalance {
    pub employer_name: String,
    pub pf_balance: f64,
}

pub fn summarize_snapshot(snapshot: &RawSnapshot, window: &TransactionWindow) -> SnapshotSummary {
    SnapshotSummary {
        net_worth: snapshot.net_worth.as_ref().map(summarize_net_worth),
        transactions: snapshot
            .transactions
            .as_ref()
            .map(|section| summarize_transactions(section, window)),
        epf: snapshot.epf.as_ref().map(summarize_epf),
    }
}

fn summarize_net_worth(section: &NetWorthSection) -> NetWorthSummary {
    let mut summary = NetWorthSummary::default();

    if let Some(response) = &section.net_worth_response {
        summary.total_net_worth = money_value(response.total_net_worth_value.as_ref());

        for asset in &response.asset_values {
            let label = strip_prefix(&asset.net_worth_attribute, "ASSET_TYPE_");
            *summary.asset_breakdown.entry(label).or_default() += asset.amount();
            summary.total_assets += asset.amount();
        }

        for liability in &response.liability_values {
            let label = strip_prefix(&liability.net_worth_attribute, "LIABILITY_TYPE_");
            *summary.liability_breakdown.entry(label).or_default() += liability.amount();
            summary.total_liabilities += liability.amount();
        }
    }

    if let Some(bulk) = &section.account_details_bulk_response {
        let accounts = &mut summary.accounts;
        accounts.total_accounts = bulk.account_details_map.len();

        for account in bulk.account_details_map.values() {
            match account.deposit_type() {
                Some(DEPOSIT_SAVINGS) => accounts.savings_accounts.add(account.deposit_balance()),
                Some(DEPOSIT_CURRENT) => accounts.current_accounts.add(account.deposit_balance()),
                Some(_) => {}
                None if account.holdings().next().is_some() => {
                    accounts.investment_accounts.add(account.holdings_value())
                }
                None => {}
            }
        }
    }

    summary.mutual_funds = section.mf_scheme_analytics.as_ref().map(summarize_mutual_funds);

    summary
}

fn summarize_mutual_funds(analytics: &MfSchemeAnalytics) -> MutualFundSummary {
    let (current, invested) = analytics
        .scheme_analytics
        .iter()
        .filter_map(|scheme| scheme.details())
        .fold((0.0, 0.0), |(current, invested), details| {
            (
                current + money_value(details.current_value.as_ref()),
                invested + money_value(details.invested_value.as_ref()),
            )
        });

    let returns = current - invested;

    MutualFundSummary {
        total_current_value: current,
        total_invested_value: invested,
        total_returns: returns,
        return_percentage: if invested > 0.0 {
            returns / invested * 100.0
        } else {
            0.0
        },
    }
}

fn summarize_transactions(
    section: &TransactionSection,
    window: &TransactionWindow,
) -> TransactionSummary {
    let banks = windowed_rows(section, window);
    let flow = CashFlow::from_banks(&banks);

    let monthly_income = flow.monthly_income();
    let monthly_expenses = flow.monthly_expenses();

    TransactionSummary {
        banks: banks.iter().map(summarize_bank).collect(),
        total_income: flow.total_income,
        total_expenses: flow.total_expenses,
        average_monthly_income: monthly_income,
        average_monthly_expenses: monthly_expenses,
        net_monthly_cashflow: monthly_income - monthly_expenses,
    }
}

fn summarize_bank(bank: &BankRows) -> BankSummary {
    let flow = CashFlow::from_rows(&bank.rows);

    let recent_transactions = bank
        .rows
        .iter()
        .rev()
        .take(RECENT_TRANSACTIONS_PER_BANK)
        .map(|row| TransactionDigest {
            amount: row.amount,
            date: row.date.format("%Y-%m-%d").to_string(),
            kind: match row.direction {
                Direction::Credit => "CREDIT".to_string(),
                Direction::Debit => "DEBIT".to_string(),
                Direction::Other(code) => format!("OTHER({})", code),
            },
            narration: row.narration.chars().take(NARRATION_LIMIT).collect(),
        })
        .collect();

    BankSummary {
        bank: bank.bank.clone(),
        total_income: flow.total_income,
        total_expenses: flow.total_expenses,
        net_cashflow: flow.total_income - flow.total_expenses,
        transaction_count: bank.rows.len(),
        recent_transactions,
    }
}

fn summarize_epf(section: &EpfSection) -> EpfSummary {
    let mut summary = EpfSummary::default();

    for account in &section.uan_accounts {
        summary.total_epf_balance += account.pf_balance();
        summary.pension_balance += account.pension_balance();

        let establishments = account.raw_details.iter().flat_map(|d| d.est_details.iter());
        for est in establishments {
            summary.employers.push(EmployerBalance {
                employer_name: est.est_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                pf_balance: amount::or_zero(est.pf_balance.as_ref().and_then(|b| b.net_balance)),
            });
        }
    }

    summary
}

fn strip_prefix(label: &str, prefix: &str) -> String {
    label.strip_prefix(prefix).unwrap_or(label).to_string()
}
