//! Events emitted by committed ledger operations.

use flash_types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// Notifications for external observers. The ledger never consumes its own events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Balance moved. `from` is null for mints, `to` is null for burns.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// An allowance was set.
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    },
    /// A time-limited balance was minted.
    Mint {
        to: AccountId,
        amount: u128,
        expires_at: Timestamp,
    },
    /// Expired tranches of `account` were burned.
    ExpiredBurned {
        account: AccountId,
        amount: u128,
        at: Timestamp,
    },
    /// The token metadata URI changed.
    MetadataUpdated { uri: String },
    /// The minting authority changed hands.
    OwnershipTransferred {
        previous: AccountId,
        new: AccountId,
    },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners run inline on the calling thread, after the operation that
/// produced the events has committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub(crate) fn emit_all(&self, events: &[LedgerEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
