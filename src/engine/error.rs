use thiserror::Error;

use crate::engine::{Amount, AmountError};
use crate::storage::StorageError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Incorrect PIN for {0}")]
    InvalidPin(String),
}

/// Every way a ledger operation can fail. None of them leave a partial write behind.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Enter a valid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    #[error("Insufficient balance on {account}: has {balance}, requested {requested}")]
    InsufficientBalance {
        account: String,
        balance: Amount,
        requested: Amount,
    },

    #[error("Balance arithmetic failed: {0}")]
    Amount(#[from] AmountError),

    #[error("Stored ledger is not valid: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
