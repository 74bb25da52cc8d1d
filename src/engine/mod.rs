mod account;
mod account_snapshot;
mod amount;
mod error;
mod ledger;
mod record;
mod session;
mod store;
mod transaction;

pub use account::Account;
pub use account_snapshot::AccountSnapshot;
pub use amount::{Amount, AmountError};
pub use error::{AuthError, LedgerError};
pub use ledger::{DEMO_ACCOUNTS, Ledger, parse_amount};
pub use record::StatementRecord;
pub use session::Session;
pub use store::{LedgerStore, STORAGE_KEY};
pub use transaction::{Transaction, TransactionKind, now};
