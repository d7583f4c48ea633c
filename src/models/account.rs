use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::format::DatePreset;
use crate::store::Record;

string_enum! {
    pub enum EntryType {
        Income => "income",
        Expense => "expense",
        IncomingLoan => "incomingLoan",
        OutgoingLoan => "outgoingLoan",
        Payout => "payout",
    }
}

impl EntryType {
    /// +1 when money comes in, -1 when it goes out
    pub fn sign(self) -> f64 {
        match self {
            EntryType::Income | EntryType::IncomingLoan => 1.0,
            EntryType::Expense | EntryType::OutgoingLoan | EntryType::Payout => -1.0,
        }
    }
}

string_enum! {
    pub enum PaymentMode {
        Cash => "cash",
        Bank => "bank",
        Upi => "upi",
        Cheque => "cheque",
        Other => "other",
    }
}

/// One line of the finance ledger
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub mode: PaymentMode,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountEntry {
    pub fn signed_amount(&self) -> f64 {
        self.amount * self.entry_type.sign()
    }
}

impl Record for AccountEntry {
    const COLLECTION: &'static str = "accounts";
    const KIND: &'static str = "Account entry";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntry {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub mode: PaymentMode,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub mode: Option<PaymentMode>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    /// Text over description and category
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub mode: Option<PaymentMode>,
    pub category: Option<String>,
    pub project_id: Option<String>,
    pub range: Option<DatePreset>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub totals_by_type: BTreeMap<EntryType, f64>,
    /// Sum of amounts per payment mode, regardless of direction
    pub totals_by_mode: BTreeMap<PaymentMode, f64>,
    /// Net movement per payment mode (inflows minus outflows)
    pub balance_by_mode: BTreeMap<PaymentMode, f64>,
    pub total_in: f64,
    pub total_out: f64,
    pub net_balance: f64,
    pub entry_count: usize,
    pub net_balance_formatted: String,
}
