use serde::{Deserialize, Serialize};

use crate::engine::record::StatementRecord;
use crate::engine::{Amount, LedgerError, Transaction};

// Client Account, stored as `{ username, pin, balance, tx }`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    #[serde(rename = "username")]
    pub id: String, // Unique
    pub pin: String,
    pub balance: Amount,
    #[serde(rename = "tx", default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(id: &str, pin: &str, balance: Amount) -> Self {
        Account {
            id: id.to_owned(),
            pin: pin.to_owned(),
            balance,
            transactions: Vec::new(),
        }
    }

    pub fn pin_matches(&self, pin: &str) -> bool {
        self.pin == pin
    }

    pub fn deposit(&mut self, amount: Amount, date: &str) -> Result<(), LedgerError> {
        self.balance = self.balance.add(&amount)?;
        self.transactions.push(Transaction::deposit(amount, date));
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount, date: &str) -> Result<(), LedgerError> {
        self.ensure_covers(amount)?;
        self.balance = self.balance.sub(&amount)?;
        self.transactions.push(Transaction::withdraw(amount, date));
        Ok(())
    }

    /// Debit side of a transfer.
    pub fn send(&mut self, to: &str, amount: Amount, date: &str) -> Result<(), LedgerError> {
        self.ensure_covers(amount)?;
        self.balance = self.balance.sub(&amount)?;
        self.transactions
            .push(Transaction::transfer_out(amount, to, date));
        Ok(())
    }

    /// Credit side of a transfer.
    pub fn receive(&mut self, from: &str, amount: Amount, date: &str) -> Result<(), LedgerError> {
        self.balance = self.balance.add(&amount)?;
        self.transactions
            .push(Transaction::transfer_in(amount, from, date));
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.transactions.clear();
    }

    pub fn ensure_covers(&self, amount: Amount) -> Result<(), LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: self.id.clone(),
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Transaction log, most recent first.
    pub fn statement(&self) -> Vec<StatementRecord> {
        self.transactions
            .iter()
            .rev()
            .map(StatementRecord::from_transaction)
            .collect()
    }
}
