//! Active and expired holdings of one account.

use flash_ledger::{Tranche, TrancheLedger};
use flash_types::{AccountId, Timestamp};
use flash_utils::format_time_to_expiry;
use serde::{Deserialize, Serialize};

/// One tranche as shown to a holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashHolding {
    pub amount: u128,
    pub expires_at: Timestamp,
    pub active: bool,
    /// `None` once expired.
    pub time_to_expiry_secs: Option<u64>,
    /// "in 1h 2m" or "expired".
    pub expires_in: String,
}

/// Summary of an account's flash balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub account: AccountId,
    pub active: u128,
    pub expired: u128,
    pub total: u128,
    pub num_tranches: usize,
    pub next_expiry: Option<Timestamp>,
    /// Sorted by expiry, soonest first.
    pub holdings: Vec<FlashHolding>,
}

impl PortfolioSummary {
    pub fn from_tranches(account: AccountId, tranches: &[Tranche], now: Timestamp) -> Self {
        let mut holdings: Vec<FlashHolding> = tranches
            .iter()
            .map(|t| {
                let active = t.is_active(now);
                FlashHolding {
                    amount: t.amount,
                    expires_at: t.expires_at,
                    active,
                    time_to_expiry_secs: active.then(|| t.expires_at.remaining_from(now)),
                    expires_in: format_time_to_expiry(t.expires_at.as_secs(), now.as_secs()),
                }
            })
            .collect();
        holdings.sort_by_key(|h| h.expires_at);

        let active: u128 = holdings.iter().filter(|h| h.active).map(|h| h.amount).sum();
        let total: u128 = holdings.iter().map(|h| h.amount).sum();
        Self {
            account,
            active,
            expired: total - active,
            total,
            num_tranches: holdings.len(),
            next_expiry: holdings.iter().find(|h| h.active).map(|h| h.expires_at),
            holdings,
        }
    }

    /// Read the summary straight from a ledger.
    pub fn of(ledger: &TrancheLedger, account: AccountId, now: Timestamp) -> Self {
        Self::from_tranches(account, &ledger.flash_balances_of(account), now)
    }
}
