//! Tranches and the per-account tranche book.
//!
//! A tranche is one slice of minted supply with its own expiry. Each account
//! keeps its tranches in a flat arena: removal swaps the victim with the last
//! live record and shrinks the length, so storage order is only meaningful as
//! "insertion order, perturbed by removals".

use flash_types::Timestamp;
use serde::{Deserialize, Serialize};

/// One time-boxed slice of balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranche {
    /// Raw token amount, always non-zero while stored.
    pub amount: u128,
    /// The tranche is active strictly before this instant.
    pub expires_at: Timestamp,
}

impl Tranche {
    pub fn new(amount: u128, expires_at: Timestamp) -> Self {
        Self { amount, expires_at }
    }

    /// Active iff `now < expires_at`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        now.is_before(self.expires_at)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        !self.is_active(now)
    }
}

/// The tranche arena of a single account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrancheBook {
    tranches: Vec<Tranche>,
}

impl TrancheBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tranches in storage order.
    pub fn as_slice(&self) -> &[Tranche] {
        &self.tranches
    }

    pub fn len(&self) -> usize {
        self.tranches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty()
    }

    /// Sum of every stored tranche, active or not. `None` if the sum does not
    /// fit in a `u128`, which only a corrupted book can produce.
    pub fn total(&self) -> Option<u128> {
        self.tranches
            .iter()
            .try_fold(0u128, |sum, t| sum.checked_add(t.amount))
    }

    pub fn active_total(&self, now: Timestamp) -> u128 {
        self.tranches
            .iter()
            .filter(|t| t.is_active(now))
            .map(|t| t.amount)
            .sum()
    }

    pub fn expired_total(&self, now: Timestamp) -> u128 {
        self.tranches
            .iter()
            .filter(|t| t.is_expired(now))
            .map(|t| t.amount)
            .sum()
    }

    /// Append a freshly minted tranche, merging into the last record when it
    /// carries the exact same expiry.
    pub(crate) fn append(&mut self, amount: u128, expires_at: Timestamp) {
        debug_assert!(amount > 0);
        match self.tranches.last_mut() {
            Some(last) if last.expires_at == expires_at => last.amount += amount,
            _ => self.tranches.push(Tranche::new(amount, expires_at)),
        }
    }

    /// Receive a slice moved by a transfer: merge into any record with the
    /// same expiry, otherwise append.
    pub(crate) fn credit(&mut self, amount: u128, expires_at: Timestamp) {
        debug_assert!(amount > 0);
        match self.tranches.iter_mut().find(|t| t.expires_at == expires_at) {
            Some(existing) => existing.amount += amount,
            None => self.tranches.push(Tranche::new(amount, expires_at)),
        }
    }

    /// Remove every expired tranche and return the amount removed.
    pub(crate) fn purge_expired(&mut self, now: Timestamp) -> u128 {
        let mut burned = 0u128;
        let mut i = 0;
        while i < self.tranches.len() {
            if self.tranches[i].is_expired(now) {
                burned += self.tranches.swap_remove(i).amount;
            } else {
                i += 1;
            }
        }
        burned
    }

    /// Take exactly `amount` of active balance, walking tranches in storage
    /// order. Returns the slices taken, each keeping its source expiry.
    ///
    /// The caller must have checked `active_total(now) >= amount`; the book is
    /// left untouched and `None` returned otherwise.
    pub(crate) fn consume(&mut self, amount: u128, now: Timestamp) -> Option<Vec<Tranche>> {
        if self.active_total(now) < amount {
            return None;
        }
        let mut remaining = amount;
        let mut taken = Vec::new();
        let mut emptied = Vec::new();
        for (idx, t) in self.tranches.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if t.is_expired(now) {
                continue;
            }
            let take = t.amount.min(remaining);
            t.amount -= take;
            remaining -= take;
            taken.push(Tranche::new(take, t.expires_at));
            if t.amount == 0 {
                emptied.push(idx);
            }
        }
        // Highest index first so earlier indices stay valid.
        for idx in emptied.into_iter().rev() {
            self.tranches.swap_remove(idx);
        }
        Some(taken)
    }
}
