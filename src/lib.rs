//! Local online-banking ledger: two seeded demo accounts, deposits,
//! withdrawals and transfers, persisted as one JSON blob in a key-value store.

pub mod engine;
pub mod storage;
