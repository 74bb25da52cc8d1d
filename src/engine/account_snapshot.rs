use serde::{Deserialize, Serialize};

use crate::engine::Account;

/// A Snapshot of an Account to easily view the content
/// It is used for decoupling output from Account (no PIN, no log) and easy serialisation
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccountSnapshot {
    pub account: String,
    pub balance: String,
    pub transactions: usize,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        AccountSnapshot {
            account: account.id.clone(),
            balance: account.balance.currency(),
            transactions: account.transactions.len(),
        }
    }
}
