use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::{Account, Amount, AmountError, AuthError, LedgerError};

/// Demo users created when either of them is missing: (id, pin, whole units).
pub const DEMO_ACCOUNTS: [(&str, &str, i64); 2] = [
    ("Shivam", "Shivam@321", 5000),
    ("Ritik", "Ritik@321", 2500),
];

/// Every account keyed by identifier. This is the whole persisted state.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

/// Parse raw user input into an amount usable by deposit, withdraw and transfer.
///
/// Text that is not a number is `InvalidAmount`; a number that cannot be held
/// exactly (too many decimals, out of range) keeps its `AmountError`.
pub fn parse_amount(raw: &str) -> Result<Amount, LedgerError> {
    let amount = match raw.parse::<Amount>() {
        Ok(amount) => amount,
        Err(AmountError::Parse(_)) => return Err(LedgerError::InvalidAmount(raw.to_owned())),
        Err(e) => return Err(e.into()),
    };
    ensure_positive(amount)
}

fn ensure_positive(amount: Amount) -> Result<Amount, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount(amount.to_string()));
    }
    Ok(amount)
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            accounts: BTreeMap::new(),
        }
    }

    /// Fresh two-account seed.
    pub fn demo() -> Self {
        let mut ledger = Ledger::new();
        for (id, pin, units) in DEMO_ACCOUNTS {
            ledger.insert(Account::new(id, pin, Amount::from_units(units)));
        }
        ledger
    }

    pub fn has_demo_accounts(&self) -> bool {
        DEMO_ACCOUNTS
            .iter()
            .all(|(id, _, _)| self.accounts.contains_key(*id))
    }

    /// Adds or replaces the account under its own identifier.
    pub fn insert(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.id.clone(), account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn get_account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn authenticate(&self, id: &str, pin: &str) -> Result<&Account, AuthError> {
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| AuthError::NotFound(id.to_owned()))?;
        if !account.pin_matches(pin) {
            return Err(AuthError::InvalidPin(id.to_owned()));
        }
        Ok(account)
    }

    pub fn deposit(&mut self, id: &str, amount: Amount, date: &str) -> Result<Account, LedgerError> {
        let amount = ensure_positive(amount)?;
        let account = self.account_mut(id)?;
        account.deposit(amount, date)?;
        Ok(account.clone())
    }

    pub fn withdraw(&mut self, id: &str, amount: Amount, date: &str) -> Result<Account, LedgerError> {
        let amount = ensure_positive(amount)?;
        let account = self.account_mut(id)?;
        account.withdraw(amount, date)?;
        Ok(account.clone())
    }

    /// Moves `amount` from `from` to `to`, appending a transfer-out and a
    /// transfer-in that share `date`. Nothing changes unless both sides succeed.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Amount,
        date: &str,
    ) -> Result<(Account, Account), LedgerError> {
        let amount = ensure_positive(amount)?;
        let recipient = self
            .accounts
            .get(to)
            .ok_or_else(|| LedgerError::RecipientNotFound(to.to_owned()))?;
        let sender = self
            .accounts
            .get(from)
            .ok_or_else(|| LedgerError::AccountNotFound(from.to_owned()))?;
        sender.ensure_covers(amount)?;
        // The credit must not overflow once the debit is applied
        if from != to {
            recipient.balance.add(&amount)?;
        }

        self.account_mut(from)?.send(to, amount, date)?;
        self.account_mut(to)?.receive(from, amount, date)?;

        Ok((self.account(from)?.clone(), self.account(to)?.clone()))
    }

    pub fn clear_history(&mut self, id: &str) -> Result<Account, LedgerError> {
        let account = self.account_mut(id)?;
        account.clear_history();
        Ok(account.clone())
    }

    fn account(&self, id: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_owned()))
    }

    fn account_mut(&mut self, id: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TransactionKind;
    use proptest::prelude::*;
    use std::str::FromStr;

    const DATE: &str = "01/01/2025, 10:00:00";

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_demo_seed() {
        let ledger = Ledger::demo();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.has_demo_accounts());
        assert_eq!(
            ledger.get_account("Shivam").unwrap().balance,
            amount("5000.00")
        );
        assert_eq!(ledger.get_account("Ritik").unwrap().balance, amount("2500.00"));
        assert!(ledger.accounts().all(|a| a.transactions.is_empty()));
    }

    #[test]
    fn test_authenticate() {
        let ledger = Ledger::demo();

        let acc = ledger.authenticate("Shivam", "Shivam@321").unwrap();
        assert_eq!(acc.id, "Shivam");

        assert_eq!(
            ledger.authenticate("Nobody", "x").unwrap_err(),
            AuthError::NotFound("Nobody".into())
        );
        assert_eq!(
            ledger.authenticate("Ritik", "Shivam@321").unwrap_err(),
            AuthError::InvalidPin("Ritik".into())
        );
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        let mut ledger = Ledger::demo();
        let before = ledger.clone();

        for bad in [Amount::ZERO, amount("-5")] {
            assert!(matches!(
                ledger.deposit("Shivam", bad, DATE),
                Err(LedgerError::InvalidAmount(_))
            ));
            assert!(matches!(
                ledger.withdraw("Shivam", bad, DATE),
                Err(LedgerError::InvalidAmount(_))
            ));
            assert!(matches!(
                ledger.transfer("Shivam", "Ritik", bad, DATE),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.5").unwrap(), amount("50.5"));
        assert!(matches!(parse_amount("0"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-1"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount(""), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_amount_accepts_exponents_and_keeps_precision() {
        assert_eq!(parse_amount("1e3").unwrap(), amount("1000"));
        assert_eq!(parse_amount(" 2.5E1 ").unwrap(), amount("25"));

        let res = parse_amount("0.00001");
        assert!(matches!(
            res,
            Err(LedgerError::Amount(AmountError::Precision(_)))
        ));
        let res = parse_amount("5.123456");
        assert!(matches!(
            res,
            Err(LedgerError::Amount(AmountError::Precision(_)))
        ));
        let res = parse_amount("1e12");
        assert!(matches!(res, Err(LedgerError::Amount(AmountError::Overflow))));
    }

    #[test]
    fn test_operations_on_missing_account() {
        let mut ledger = Ledger::demo();
        assert!(matches!(
            ledger.deposit("Ghost", amount("1"), DATE),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.clear_history("Ghost"),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.transfer("Ghost", "Ritik", amount("1"), DATE),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_transfer_to_unknown_recipient() {
        let mut ledger = Ledger::demo();
        let res = ledger.transfer("Shivam", "Ghost", amount("10"), DATE);
        assert!(matches!(res, Err(LedgerError::RecipientNotFound(id)) if id == "Ghost"));
        assert_eq!(ledger, Ledger::demo());
    }

    #[test]
    fn test_recipient_is_checked_before_balance() {
        let mut ledger = Ledger::demo();
        let res = ledger.transfer("Shivam", "Ghost", amount("999999"), DATE);
        assert!(matches!(res, Err(LedgerError::RecipientNotFound(_))));
    }

    #[test]
    fn test_transfer_overflow_leaves_sender_untouched() {
        let mut ledger = Ledger::demo();
        ledger.insert(Account::new("Rich", "p", amount("99999999999")));
        let res = ledger.transfer("Shivam", "Rich", amount("1000"), DATE);
        assert!(matches!(res, Err(LedgerError::Amount(_))));
        assert_eq!(ledger.get_account("Shivam").unwrap().balance, amount("5000"));
        assert!(ledger.get_account("Shivam").unwrap().transactions.is_empty());
    }

    #[test]
    fn test_transfer_to_self_keeps_balance() {
        let mut ledger = Ledger::demo();
        let (from, to) = ledger
            .transfer("Ritik", "Ritik", amount("100"), DATE)
            .unwrap();
        assert_eq!(from.balance, amount("2500"));
        assert_eq!(to.transactions.len(), 2);
        assert_eq!(to.transactions[0].kind, TransactionKind::TransferOut);
        assert_eq!(to.transactions[1].kind, TransactionKind::TransferIn);
    }

    #[test]
    fn test_clear_history_keeps_balance() {
        let mut ledger = Ledger::demo();
        ledger.deposit("Ritik", amount("10"), DATE).unwrap();
        ledger.withdraw("Ritik", amount("3"), DATE).unwrap();

        let acc = ledger.clear_history("Ritik").unwrap();
        assert!(acc.transactions.is_empty());
        assert_eq!(acc.balance, amount("2507"));
    }

    #[test]
    fn test_demo_scenario() {
        let mut ledger = Ledger::demo();

        let (shivam, ritik) = ledger
            .transfer("Shivam", "Ritik", amount("1000"), DATE)
            .unwrap();
        assert_eq!(shivam.balance.currency(), "₹4000.00");
        assert_eq!(ritik.balance.currency(), "₹3500.00");

        let res = ledger.withdraw("Shivam", amount("10000"), DATE);
        assert!(matches!(res, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(
            ledger.get_account("Shivam").unwrap().balance.currency(),
            "₹4000.00"
        );

        let ritik = ledger.deposit("Ritik", amount("50.5"), DATE).unwrap();
        assert_eq!(ritik.balance.currency(), "₹3550.50");
        let last = ritik.transactions.last().unwrap();
        assert_eq!(last.kind, TransactionKind::Deposit);
        assert_eq!(last.amount, amount("50.5"));
    }

    #[test]
    fn test_blob_format() {
        let raw = r#"{
            "Shivam": {"username":"Shivam","pin":"Shivam@321","balance":4000,
                       "tx":[{"type":"transfer-out","amount":1000,"to":"Ritik","date":"d"}]},
            "Ritik": {"username":"Ritik","pin":"Ritik@321","balance":3500,
                      "tx":[{"type":"transfer-in","amount":1000,"from":"Shivam","date":"d"}]}
        }"#;
        let ledger: Ledger = serde_json::from_str(raw).unwrap();
        assert!(ledger.has_demo_accounts());
        assert_eq!(
            ledger.get_account("Ritik").unwrap().transactions[0].counterparty(),
            Some("Shivam")
        );

        let again: Ledger = serde_json::from_str(&serde_json::to_string(&ledger).unwrap()).unwrap();
        assert_eq!(again, ledger);
    }

    // Amounts in 1/10000 units, up to `max`
    fn units(max: i64) -> impl Strategy<Value = Amount> {
        (1i64..=max).prop_map(|v| Amount::try_from(v as f64 / 10_000.0).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: deposit adds exactly the amount and appends one entry.
        #[test]
        fn deposit_adds_amount(a in units(200_000_000)) {
            let mut ledger = Ledger::demo();
            let before = ledger.get_account("Ritik").unwrap().balance;

            let acc = ledger.deposit("Ritik", a, DATE).unwrap();

            prop_assert_eq!(acc.balance, before.add(&a).unwrap());
            prop_assert_eq!(acc.transactions.len(), 1);
            prop_assert_eq!(acc.transactions[0].kind, TransactionKind::Deposit);
            prop_assert_eq!(acc.transactions[0].amount, a);
        }

        /// Property: withdraw succeeds iff the balance covers the amount.
        #[test]
        fn withdraw_respects_balance(a in units(200_000_000)) {
            let mut ledger = Ledger::demo();
            let before = ledger.get_account("Shivam").unwrap().balance;

            let res = ledger.withdraw("Shivam", a, DATE);
            let after = ledger.get_account("Shivam").unwrap();

            if a <= before {
                prop_assert!(res.is_ok());
                prop_assert_eq!(after.balance, before.sub(&a).unwrap());
                prop_assert_eq!(after.transactions.len(), 1);
            } else {
                let insufficient = matches!(res, Err(LedgerError::InsufficientBalance { .. }));
                prop_assert!(insufficient);
                prop_assert_eq!(after.balance, before);
                prop_assert!(after.transactions.is_empty());
            }
        }

        /// Property: a covered transfer moves the amount and pairs the entries.
        /// Amounts never exceed Shivam's 5000.0000 seed balance.
        #[test]
        fn transfer_pairs_entries(a in units(50_000_000)) {
            let mut ledger = Ledger::demo();
            let sender_before = ledger.get_account("Shivam").unwrap().balance;
            let recipient_before = ledger.get_account("Ritik").unwrap().balance;

            let (sender, recipient) = ledger.transfer("Shivam", "Ritik", a, DATE).unwrap();

            prop_assert_eq!(sender.balance, sender_before.sub(&a).unwrap());
            prop_assert_eq!(recipient.balance, recipient_before.add(&a).unwrap());

            let out = &sender.transactions[0];
            let inc = &recipient.transactions[0];
            prop_assert_eq!(out.kind, TransactionKind::TransferOut);
            prop_assert_eq!(inc.kind, TransactionKind::TransferIn);
            prop_assert_eq!(out.amount, a);
            prop_assert_eq!(inc.amount, a);
            prop_assert_eq!(out.to.as_deref(), Some("Ritik"));
            prop_assert_eq!(inc.from.as_deref(), Some("Shivam"));
            prop_assert_eq!(&out.date, &inc.date);
        }
    }
}
