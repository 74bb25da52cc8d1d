use serde::{Deserialize, Serialize};

use crate::engine::Amount;

/// Human-readable local time used to stamp new transactions.
pub fn now() -> String {
    chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// One entry of an account's log. Never modified once appended.
///
/// Field names follow the persisted blob: `type`, `amount`, `to`, `from`, `date`.
/// `to` is only present on `transfer-out`, `from` only on `transfer-in`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::TransferOut => "transfer-out",
            TransactionKind::TransferIn => "transfer-in",
        }
    }
}

impl Transaction {
    pub fn deposit(amount: Amount, date: &str) -> Self {
        Transaction {
            kind: TransactionKind::Deposit,
            amount,
            to: None,
            from: None,
            date: date.to_owned(),
        }
    }

    pub fn withdraw(amount: Amount, date: &str) -> Self {
        Transaction {
            kind: TransactionKind::Withdraw,
            amount,
            to: None,
            from: None,
            date: date.to_owned(),
        }
    }

    pub fn transfer_out(amount: Amount, to: &str, date: &str) -> Self {
        Transaction {
            kind: TransactionKind::TransferOut,
            amount,
            to: Some(to.to_owned()),
            from: None,
            date: date.to_owned(),
        }
    }

    pub fn transfer_in(amount: Amount, from: &str, date: &str) -> Self {
        Transaction {
            kind: TransactionKind::TransferIn,
            amount,
            to: None,
            from: Some(from.to_owned()),
            date: date.to_owned(),
        }
    }

    /// The other side of a transfer, `None` for cash operations.
    pub fn counterparty(&self) -> Option<&str> {
        self.to.as_deref().or(self.from.as_deref())
    }
}
