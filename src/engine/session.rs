use crate::engine::{Account, Amount, LedgerError, LedgerStore, StatementRecord};
use crate::storage::KeyValueStore;

/// The logged in user, held by the caller and handed back on every call.
/// Logging out is dropping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account_id: String,
}

impl Session {
    pub fn login<S: KeyValueStore>(
        store: &LedgerStore<S>,
        id: &str,
        pin: &str,
    ) -> Result<(Session, Account), LedgerError> {
        let account = store.authenticate(id, pin)?;
        let session = Session {
            account_id: account.id.clone(),
        };
        Ok((session, account))
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Re-reads the logged in account.
    pub fn refresh<S: KeyValueStore>(&self, store: &LedgerStore<S>) -> Result<Account, LedgerError> {
        store.account(&self.account_id)
    }

    pub fn statement<S: KeyValueStore>(
        &self,
        store: &LedgerStore<S>,
    ) -> Result<Vec<StatementRecord>, LedgerError> {
        store.statement(&self.account_id)
    }

    pub fn deposit<S: KeyValueStore>(
        &self,
        store: &mut LedgerStore<S>,
        amount: Amount,
    ) -> Result<Account, LedgerError> {
        store.deposit(&self.account_id, amount)
    }

    pub fn withdraw<S: KeyValueStore>(
        &self,
        store: &mut LedgerStore<S>,
        amount: Amount,
    ) -> Result<Account, LedgerError> {
        store.withdraw(&self.account_id, amount)
    }

    pub fn transfer<S: KeyValueStore>(
        &self,
        store: &mut LedgerStore<S>,
        to: &str,
        amount: Amount,
    ) -> Result<(Account, Account), LedgerError> {
        store.transfer(&self.account_id, to, amount)
    }

    pub fn clear_history<S: KeyValueStore>(
        &self,
        store: &mut LedgerStore<S>,
    ) -> Result<Account, LedgerError> {
        store.clear_history(&self.account_id)
    }
}
