//! Typed model of the provider's raw financial snapshot
//!
//! Every section and nearly every field is optional. Missing branches
//! decode to `None` or empty collections; the extractor decides what a
//! missing value means.

pub mod amount;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Write;

use crate::Result;
pub use amount::Amount;

//
// ================= Root =================
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub net_worth: Option<NetWorthSection>,
    pub transactions: Option<TransactionSection>,
    pub epf: Option<EpfSection>,
}

impl RawSnapshot {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// SHA-256 over the canonical JSON of the decoded snapshot.
    ///
    /// Serialization streams straight into the hasher.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        if serde_json::to_writer(&mut HashWriter(&mut hasher), self).is_err() {
            return String::new();
        }

        hex::encode(hasher.finalize())
    }
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

//
// ================= Net worth =================
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub units: Option<Amount>,
    pub currency_code: Option<String>,
}

impl Money {
    pub fn value(&self) -> f64 {
        amount::or_zero(self.units)
    }
}

/// Reads an optional money field, treating absence as zero.
pub fn money_value(money: Option<&Money>) -> f64 {
    money.map(Money::value).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSection {
    pub net_worth_response: Option<NetWorthResponse>,
    pub account_details_bulk_response: Option<AccountDetailsBulk>,
    pub mf_scheme_analytics: Option<MfSchemeAnalytics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthResponse {
    pub total_net_worth_value: Option<Money>,
    #[serde(default)]
    pub asset_values: Vec<NetWorthEntry>,
    #[serde(default)]
    pub liability_values: Vec<NetWorthEntry>,
}

/// One asset or liability line, e.g. `ASSET_TYPE_MUTUAL_FUND`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthEntry {
    #[serde(default)]
    pub net_worth_attribute: String,
    pub value: Option<Money>,
}

impl NetWorthEntry {
    pub fn amount(&self) -> f64 {
        money_value(self.value.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsBulk {
    #[serde(default)]
    pub account_details_map: BTreeMap<String, AccountRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub account_details: Option<AccountDetails>,
    pub deposit_summary: Option<DepositSummary>,
    pub equity_summary: Option<HoldingSummary>,
    pub etf_summary: Option<HoldingSummary>,
    pub reit_summary: Option<HoldingSummary>,
}

impl AccountRecord {
    pub fn deposit_type(&self) -> Option<&str> {
        self.account_details
            .as_ref()
            .and_then(|d| d.account_type.as_ref())
            .and_then(|t| t.deposit_account_type.as_deref())
    }

    pub fn deposit_balance(&self) -> f64 {
        money_value(
            self.deposit_summary
                .as_ref()
                .and_then(|s| s.current_balance.as_ref()),
        )
    }

    /// Equity, ETF and REIT summaries present on this account.
    pub fn holdings(&self) -> impl Iterator<Item = &HoldingSummary> {
        [&self.equity_summary, &self.etf_summary, &self.reit_summary]
            .into_iter()
            .flatten()
    }

    pub fn holdings_value(&self) -> f64 {
        self.holdings()
            .map(|h| money_value(h.current_value.as_ref()))
            .sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub account_type: Option<AccountType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountType {
    pub deposit_account_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSummary {
    pub current_balance: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSummary {
    pub current_value: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfSchemeAnalytics {
    #[serde(default)]
    pub scheme_analytics: Vec<SchemeAnalytics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeAnalytics {
    pub enriched_analytics: Option<EnrichedAnalytics>,
}

impl SchemeAnalytics {
    pub fn details(&self) -> Option<&SchemeDetails> {
        self.enriched_analytics
            .as_ref()
            .and_then(|e| e.analytics.as_ref())
            .and_then(|a| a.scheme_details.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAnalytics {
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub scheme_details: Option<SchemeDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDetails {
    pub current_value: Option<Money>,
    pub invested_value: Option<Money>,
}

//
// ================= Transactions =================
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSection {
    #[serde(default)]
    pub bank_transactions: Vec<BankTransactions>,
}

/// Transactions for one bank. Rows stay untyped here: a malformed row
/// is skipped during extraction instead of failing the whole decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankTransactions {
    pub bank: Option<String>,
    #[serde(default)]
    pub txns: Vec<Value>,
}

//
// ================= EPF =================
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpfSection {
    #[serde(default)]
    pub uan_accounts: Vec<UanAccount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UanAccount {
    pub raw_details: Option<EpfDetails>,
}

// The EPF payload uses snake_case keys, unlike the rest of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpfDetails {
    pub overall_pf_balance: Option<PfBalance>,
    #[serde(default)]
    pub est_details: Vec<Establishment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PfBalance {
    pub current_pf_balance: Option<Amount>,
    pub pension_balance: Option<Amount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Establishment {
    pub est_name: Option<String>,
    pub pf_balance: Option<EstablishmentBalance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstablishmentBalance {
    pub net_balance: Option<Amount>,
}

impl UanAccount {
    pub fn pf_balance(&self) -> f64 {
        amount::or_zero(self.overall().and_then(|b| b.current_pf_balance))
    }

    pub fn pension_balance(&self) -> f64 {
        amount::or_zero(self.overall().and_then(|b| b.pension_balance))
    }

    fn overall(&self) -> Option<&PfBalance> {
        self.raw_details
            .as_ref()
            .and_then(|d| d.overall_pf_balance.as_ref())
    }
}
