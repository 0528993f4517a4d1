//! Transaction row parsing and cash-flow aggregation
//!
//! Rows are positional: `[amount, narration, date, direction, ...]`.
//! A row that fails to parse is dropped; it never aborts extraction.

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::TransactionWindow;
use crate::snapshot::amount::parse_numeric;
use crate::snapshot::TransactionSection;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
    Other(i64),
}

impl From<i64> for Direction {
    fn from(code: i64) -> Self {
        match code {
            1 => Direction::Credit,
            2 => Direction::Debit,
            other => Direction::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub amount: f64,
    pub narration: String,
    pub date: NaiveDate,
    pub direction: Direction,
}

impl TransactionRow {
    /// Parse one positional row. `None` means the row is skipped.
    pub fn parse(raw: &Value) -> Option<Self> {
        let fields = raw.as_array()?;

        let amount = number_field(fields.first()?)?;
        let date = NaiveDate::parse_from_str(fields.get(2)?.as_str()?.trim(), DATE_FORMAT).ok()?;
        let direction = direction_field(fields.get(3)?)?;
        let narration = fields
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self {
            amount,
            narration,
            date,
            direction,
        })
    }

    fn month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn direction_field(value: &Value) -> Option<Direction> {
    let code = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    Some(Direction::from(code))
}

/// Parsed, windowed rows for one bank, in source order.
#[derive(Debug, Clone, Default)]
pub struct BankRows {
    pub bank: String,
    pub rows: Vec<TransactionRow>,
    pub skipped: usize,
}

/// Parse every bank's rows and apply the transaction window.
pub fn windowed_rows(section: &TransactionSection, window: &TransactionWindow) -> Vec<BankRows> {
    let mut banks: Vec<BankRows> = section
        .bank_transactions
        .iter()
        .map(|bank| {
            let start = window
                .max_per_account
                .map(|max| bank.txns.len().saturating_sub(max))
                .unwrap_or(0);

            let mut parsed = BankRows {
                bank: bank.bank.clone().unwrap_or_else(|| "Unknown".to_string()),
                ..Default::default()
            };

            for raw in &bank.txns[start..] {
                match TransactionRow::parse(raw) {
                    Some(row) => parsed.rows.push(row),
                    None => parsed.skipped += 1,
                }
            }

            parsed
        })
        .collect();

    if let Some(days) = window.lookback_days {
        let anchor = window.as_of.or_else(|| {
            banks
                .iter()
                .flat_map(|b| b.rows.iter().map(|r| r.date))
                .max()
        });

        // No cutoff when it falls before the earliest representable date.
        let cutoff =
            anchor.and_then(|anchor| anchor.checked_sub_signed(Duration::days(i64::from(days))));
        if let Some(cutoff) = cutoff {
            for bank in &mut banks {
                bank.rows.retain(|row| row.date >= cutoff);
            }
        }
    }

    banks
}

/// Income and expense totals over the distinct calendar months observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlow {
    pub total_income: f64,
    pub total_expenses: f64,
    pub months: BTreeSet<(i32, u32)>,
}

impl CashFlow {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRow>,
    {
        let mut flow = Self::default();
        for row in rows {
            flow.months.insert(row.month());
            match row.direction {
                Direction::Credit => flow.total_income += row.amount,
                Direction::Debit => flow.total_expenses += row.amount,
                Direction::Other(_) => {}
            }
        }
        flow
    }

    pub fn from_banks(banks: &[BankRows]) -> Self {
        let flow = Self::from_rows(banks.iter().flat_map(|b| b.rows.iter()));

        debug!(
            banks = banks.len(),
            skipped_rows = banks.iter().map(|b| b.skipped).sum::<usize>(),
            months = flow.months.len(),
            "Aggregated transaction cash flow"
        );

        flow
    }

    /// Distinct months seen, never less than one.
    pub fn month_count(&self) -> usize {
        self.months.len().max(1)
    }

    pub fn monthly_income(&self) -> f64 {
        self.total_income / self.month_count() as f64
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.total_expenses / self.month_count() as f64
    }
}
