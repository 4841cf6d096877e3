//! Resource footprint tracker
//!
//! Holds every resource touched so far in one batch. Checks are pure
//! predicates and commits are unconditional inserts; nothing is ever removed,
//! so the footprint only grows for the life of the batch.

use crate::resource::{BalanceKey, DataKey, Direction, MarketKey};
use spar_primitives::AccountId;
use std::collections::{HashMap, HashSet};

/// Accumulated resource footprint of a batch
///
/// One instance per ledger. It is owned by a single sequential replay and
/// needs no synchronisation.
#[derive(Clone, Debug, Default)]
pub struct ConflictModel {
    /// Balances that were credited
    balances_up: HashSet<BalanceKey>,
    /// Balances that were debited
    balances_down: HashSet<BalanceKey>,
    /// Markets traded in
    markets: HashSet<MarketKey>,
    /// Accounts created, merged or merged into
    accounts: HashSet<AccountId>,
    /// Data entry names per account
    data: HashMap<AccountId, HashSet<String>>,
}

impl ConflictModel {
    /// Create an empty footprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that a balance is untouched in both directions
    ///
    /// Credits and debits exclude each other because either can run into
    /// trust line limits or overflow.
    pub fn check_balance(&self, key: &BalanceKey) -> bool {
        !(self.balances_up.contains(key) || self.balances_down.contains(key))
    }

    /// Check that a balance may be credited
    pub fn check_balance_up(&self, key: &BalanceKey) -> bool {
        self.check_balance(key)
    }

    /// Check that a balance may be debited
    pub fn check_balance_down(&self, key: &BalanceKey) -> bool {
        self.check_balance(key)
    }

    /// Record a balance change in the given direction
    pub fn commit_balance(&mut self, direction: Direction, key: BalanceKey) {
        match direction {
            Direction::Up => self.balances_up.insert(key),
            Direction::Down => self.balances_down.insert(key),
        };
    }

    /// Record a credit
    pub fn commit_balance_up(&mut self, key: BalanceKey) {
        self.commit_balance(Direction::Up, key);
    }

    /// Record a debit
    pub fn commit_balance_down(&mut self, key: BalanceKey) {
        self.commit_balance(Direction::Down, key);
    }

    /// Check that a market is untouched
    pub fn check_market(&self, key: &MarketKey) -> bool {
        !self.markets.contains(key)
    }

    /// Record a market
    pub fn commit_market(&mut self, key: MarketKey) {
        self.markets.insert(key);
    }

    /// Check that an account identity is untouched
    pub fn check_identity_modify(&self, account: &AccountId) -> bool {
        !self.accounts.contains(account)
    }

    /// Record an account identity change
    pub fn commit_identity_modify(&mut self, account: AccountId) {
        self.accounts.insert(account);
    }

    /// Check that a data entry is untouched
    ///
    /// An account with no recorded entries is free for every name.
    pub fn check_data(&self, key: &DataKey) -> bool {
        self.data
            .get(&key.account)
            .map_or(true, |names| !names.contains(&key.name))
    }

    /// Record a data entry
    pub fn commit_data(&mut self, key: DataKey) {
        self.data.entry(key.account).or_default().insert(key.name);
    }

    /// Number of distinct balance keys touched in either direction
    pub fn touched_balance_count(&self) -> usize {
        self.balances_up.union(&self.balances_down).count()
    }

    /// Number of markets touched
    pub fn touched_market_count(&self) -> usize {
        self.markets.len()
    }

    /// Number of account identities touched
    pub fn touched_account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of data entries touched across all accounts
    pub fn touched_data_count(&self) -> usize {
        self.data.values().map(HashSet::len).sum()
    }

    /// Check if nothing has been touched yet
    pub fn is_empty(&self) -> bool {
        self.balances_up.is_empty()
            && self.balances_down.is_empty()
            && self.markets.is_empty()
            && self.accounts.is_empty()
            && self.data.is_empty()
    }
}
