//! The single owned ledger state: accounts, allowances, supply, authority.

use std::collections::BTreeMap;

use flash_types::{AccountId, TokenParams};
use serde::{Deserialize, Serialize};

use crate::tranche::TrancheBook;

/// Per-account bookkeeping.
///
/// `balance` mirrors the fungible balance and always equals the sum of `tranches`
/// once an operation has completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u128,
    pub tranches: TrancheBook,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.tranches.is_empty()
    }
}

/// Everything the ledger persists.
///
/// Maps are ordered so that encoded snapshots are byte-for-byte reproducible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub params: TokenParams,
    /// The minting authority.
    pub owner: AccountId,
    pub metadata_uri: String,
    pub total_supply: u128,
    pub accounts: BTreeMap<AccountId, Account>,
    /// `(owner, spender) -> remaining allowance`.
    pub allowances: BTreeMap<(AccountId, AccountId), u128>,
}

impl LedgerState {
    pub fn new(owner: AccountId, params: TokenParams) -> Self {
        Self {
            params,
            owner,
            metadata_uri: String::new(),
            total_supply: 0,
            accounts: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub(crate) fn account_mut(&mut self, id: AccountId) -> &mut Account {
        self.accounts.entry(id).or_default()
    }

    /// Drop the record of an account that holds nothing.
    pub(crate) fn prune(&mut self, id: &AccountId) {
        if self.accounts.get(id).is_some_and(Account::is_empty) {
            self.accounts.remove(id);
        }
    }

    /// Check the bookkeeping invariants: every account's balance equals the sum
    /// of its tranches, no tranche is empty, and supply equals the sum of balances.
    pub fn is_consistent(&self) -> bool {
        let mut sum = 0u128;
        for account in self.accounts.values() {
            if account.tranches.total() != Some(account.balance) {
                return false;
            }
            if account.tranches.as_slice().iter().any(|t| t.amount == 0) {
                return false;
            }
            sum = match sum.checked_add(account.balance) {
                Some(s) => s,
                None => return false,
            };
        }
        sum == self.total_supply
    }
}
