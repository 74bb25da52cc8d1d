use crate::engine::transaction;
use crate::engine::{Account, Amount, Ledger, LedgerError, StatementRecord};
use crate::storage::KeyValueStore;

/// Key holding the serialised ledger.
pub const STORAGE_KEY: &str = "obs_accounts";

/// Repository over the persisted ledger.
///
/// Every operation loads the whole ledger, changes it in memory and writes it
/// back once. A failed operation writes nothing. Mutations take `&mut self`,
/// which keeps a single writer per store.
pub struct LedgerStore<S: KeyValueStore> {
    storage: S,
    clock: fn() -> String,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, transaction::now)
    }

    /// Use a custom timestamp source for new transactions.
    pub fn with_clock(storage: S, clock: fn() -> String) -> Self {
        LedgerStore { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// A missing key is an empty ledger.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        log::debug!("Loading ledger from key {STORAGE_KEY}");
        match self.storage.get(STORAGE_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Ledger::new()),
        }
    }

    pub fn save(&mut self, ledger: &Ledger) -> Result<(), LedgerError> {
        log::debug!("Saving ledger with {} accounts", ledger.len());
        let blob = serde_json::to_string(ledger)?;
        self.storage.set(STORAGE_KEY, blob)?;
        Ok(())
    }

    /// Writes the demo seed over everything when either demo account is
    /// missing. Other accounts present at that point are lost.
    pub fn ensure_seeded(&mut self) -> Result<Ledger, LedgerError> {
        let ledger = self.load()?;
        if ledger.has_demo_accounts() {
            return Ok(ledger);
        }
        if !ledger.is_empty() {
            log::warn!(
                "Demo accounts missing, replacing ledger of {} accounts with the demo seed",
                ledger.len()
            );
        }
        self.reset_demo()
    }

    /// Unconditionally replace the stored ledger with the demo seed.
    pub fn reset_demo(&mut self) -> Result<Ledger, LedgerError> {
        let seed = Ledger::demo();
        self.save(&seed)?;
        log::info!("Demo accounts created");
        Ok(seed)
    }

    pub fn authenticate(&self, id: &str, pin: &str) -> Result<Account, LedgerError> {
        let ledger = self.load()?;
        let account = ledger.authenticate(id, pin)?;
        log::info!("Logged in as {id}");
        Ok(account.clone())
    }

    pub fn account(&self, id: &str) -> Result<Account, LedgerError> {
        self.load()?
            .get_account(id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_owned()))
    }

    pub fn statement(&self, id: &str) -> Result<Vec<StatementRecord>, LedgerError> {
        Ok(self.account(id)?.statement())
    }

    pub fn deposit(&mut self, id: &str, amount: Amount) -> Result<Account, LedgerError> {
        let account = self.mutate(|ledger, date| ledger.deposit(id, amount, date))?;
        log::info!("Deposit of {amount} to {id} successful");
        Ok(account)
    }

    pub fn withdraw(&mut self, id: &str, amount: Amount) -> Result<Account, LedgerError> {
        let account = self.mutate(|ledger, date| ledger.withdraw(id, amount, date))?;
        log::info!("Withdrawal of {amount} from {id} successful");
        Ok(account)
    }

    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(Account, Account), LedgerError> {
        let accounts = self.mutate(|ledger, date| ledger.transfer(from, to, amount, date))?;
        log::info!("Transfer of {amount} from {from} to {to} successful");
        Ok(accounts)
    }

    pub fn clear_history(&mut self, id: &str) -> Result<Account, LedgerError> {
        let account = self.mutate(|ledger, _| ledger.clear_history(id))?;
        log::info!("Transaction history of {id} cleared");
        Ok(account)
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut Ledger, &str) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut ledger = self.load()?;
        let date = (self.clock)();
        let out = op(&mut ledger, &date)?;
        self.save(&ledger)?;
        Ok(out)
    }
}
