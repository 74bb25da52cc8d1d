use serde::{Deserialize, Serialize};

use crate::engine::Transaction;

/// One flat statement line, used when writing an account history out as CSV.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatementRecord {
    pub date: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub amount: String,
    pub counterparty: String,
}

impl StatementRecord {
    /// CSV header row, in field order.
    pub const HEADERS: [&'static str; 4] = ["date", "type", "amount", "counterparty"];

    pub fn from_transaction(tx: &Transaction) -> Self {
        StatementRecord {
            date: tx.date.clone(),
            typ: tx.kind.as_str().to_owned(),
            amount: tx.amount.currency(),
            counterparty: tx.counterparty().unwrap_or_default().to_owned(),
        }
    }
}
