//! The tranche ledger engine.
//!
//! Every balance is backed by tranches carrying an expiry. Expiry is not an
//! event: a tranche is simply inactive once `now >= expires_at`, and the dead
//! amount stays on the books until something touches the account (a mint to
//! it, a transfer in or out, or a permissionless `burn_expired` / sweep).
//!
//! Operations are atomic: all checks that can fail run before the first
//! mutation, and events are only published after the operation has committed.

use flash_types::{AccountId, Timestamp, TokenParams};

use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::snapshot::LedgerSnapshot;
use crate::state::LedgerState;
use crate::tranche::Tranche;

/// The flash token ledger: one owned state plus an event bus.
pub struct TrancheLedger {
    state: LedgerState,
    events: EventBus,
}

impl std::fmt::Debug for TrancheLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrancheLedger")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TrancheLedger {
    /// Create an empty ledger whose minting authority is `owner`.
    pub fn new(owner: AccountId, params: TokenParams) -> Self {
        Self::from_state(LedgerState::new(owner, params))
    }

    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state,
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Register a listener for committed events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Capture the full state for persistence.
    pub fn snapshot(&self, now: Timestamp) -> LedgerSnapshot {
        LedgerSnapshot::new(self.state.clone(), now)
    }

    /// Rebuild a ledger from a decoded snapshot. Listeners are not persisted.
    pub fn restore(snapshot: LedgerSnapshot) -> Self {
        Self::from_state(snapshot.state)
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.state.params.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.params.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.state.params.decimals
    }

    /// The minting authority.
    pub fn get_owner(&self) -> AccountId {
        self.state.owner
    }

    pub fn metadata_uri(&self) -> &str {
        &self.state.metadata_uri
    }

    pub fn total_supply(&self) -> u128 {
        self.state.total_supply
    }

    /// Gross balance: active plus expired-but-not-yet-burned.
    pub fn balance_of(&self, account: AccountId) -> u128 {
        self.state.account(&account).map_or(0, |a| a.balance)
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.state
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of tranches with `now < expires_at`.
    pub fn active_balance_of(&self, account: AccountId, now: Timestamp) -> u128 {
        self.state
            .account(&account)
            .map_or(0, |a| a.tranches.active_total(now))
    }

    /// Sum of tranches with `now >= expires_at` that have not been burned yet.
    pub fn expired_balance_of(&self, account: AccountId, now: Timestamp) -> u128 {
        self.state
            .account(&account)
            .map_or(0, |a| a.tranches.expired_total(now))
    }

    /// Stored tranches of `account` in storage order, expired ones included.
    pub fn flash_balances_of(&self, account: AccountId) -> Vec<Tranche> {
        self.state
            .account(&account)
            .map(|a| a.tranches.as_slice().to_vec())
            .unwrap_or_default()
    }

    // ── Minting authority ────────────────────────────────────────────────

    /// Mint `amount` to `to`, active until `expires_at`.
    pub fn mint(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: u128,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if to.is_zero() {
            return Err(LedgerError::NullAccount { role: "recipient" });
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if !now.is_before(expires_at) {
            return Err(LedgerError::ExpiryNotInFuture { expires_at, now });
        }
        // Expiry sync only shrinks supply, so this bound holds after it too.
        if self.state.total_supply.checked_add(amount).is_none() {
            return Err(LedgerError::Overflow("total supply"));
        }

        let mut events = Vec::new();
        self.sync_expiry(to, now, &mut events);

        let account = self.state.account_mut(to);
        account.tranches.append(amount, expires_at);
        account.balance += amount;
        self.state.total_supply += amount;

        tracing::info!(%to, amount, %expires_at, "flash balance minted");
        events.push(LedgerEvent::Transfer {
            from: AccountId::ZERO,
            to,
            amount,
        });
        events.push(LedgerEvent::Mint {
            to,
            amount,
            expires_at,
        });
        self.events.emit_all(&events);
        Ok(())
    }

    pub fn set_metadata_uri(
        &mut self,
        caller: AccountId,
        uri: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        let uri = uri.into();
        self.state.metadata_uri = uri.clone();
        tracing::info!(%uri, "metadata uri updated");
        self.events.emit(&LedgerEvent::MetadataUpdated { uri });
        Ok(())
    }

    /// Hand the minting authority to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(LedgerError::NullAccount { role: "new owner" });
        }
        let previous = std::mem::replace(&mut self.state.owner, new_owner);
        tracing::info!(%previous, new = %new_owner, "minting authority transferred");
        self.events.emit(&LedgerEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }

    // ── Holders ──────────────────────────────────────────────────────────

    /// Move `amount` of the caller's active balance to `to`.
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::NullAccount { role: "sender" });
        }
        if to.is_zero() {
            return Err(LedgerError::NullAccount { role: "recipient" });
        }
        let mut events = Vec::new();
        self.move_balance(caller, to, amount, now, &mut events)?;
        self.events.emit_all(&events);
        Ok(())
    }

    pub fn approve(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::NullAccount { role: "owner" });
        }
        if spender.is_zero() {
            return Err(LedgerError::NullAccount { role: "spender" });
        }
        self.set_allowance(caller, spender, amount);
        self.events.emit(&LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `from`, spending the
    /// caller's allowance. An allowance of `u128::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if from.is_zero() {
            return Err(LedgerError::NullAccount { role: "sender" });
        }
        if to.is_zero() {
            return Err(LedgerError::NullAccount { role: "recipient" });
        }
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }

        let mut events = Vec::new();
        self.move_balance(from, to, amount, now, &mut events)?;
        if allowed != u128::MAX {
            self.set_allowance(from, caller, allowed - amount);
        }
        self.events.emit_all(&events);
        Ok(())
    }

    /// Destroy `amount` of the caller's active balance.
    pub fn burn(
        &mut self,
        caller: AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if caller.is_zero() {
            return Err(LedgerError::NullAccount { role: "burner" });
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let mut events = Vec::new();
        self.move_balance(caller, AccountId::ZERO, amount, now, &mut events)?;
        self.events.emit_all(&events);
        Ok(())
    }

    // ── Permissionless hygiene ───────────────────────────────────────────

    /// Burn every expired tranche of `account`. Anyone may call this for any
    /// account. Returns the amount burned.
    pub fn burn_expired(&mut self, account: AccountId, now: Timestamp) -> u128 {
        let mut events = Vec::new();
        let burned = self.sync_expiry(account, now, &mut events);
        self.events.emit_all(&events);
        burned
    }

    /// `burn_expired` for each listed account. Returns the total burned.
    pub fn sweep_expired(&mut self, accounts: &[AccountId], now: Timestamp) -> u128 {
        let mut events = Vec::new();
        let mut total = 0u128;
        for &account in accounts {
            total += self.sync_expiry(account, now, &mut events);
        }
        tracing::debug!(accounts = accounts.len(), total, "sweep finished");
        self.events.emit_all(&events);
        total
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn ensure_owner(&self, caller: AccountId) -> Result<(), LedgerError> {
        if caller != self.state.owner {
            return Err(LedgerError::Unauthorized { caller });
        }
        Ok(())
    }

    fn set_allowance(&mut self, owner: AccountId, spender: AccountId, amount: u128) {
        if amount == 0 {
            self.state.allowances.remove(&(owner, spender));
        } else {
            self.state.allowances.insert((owner, spender), amount);
        }
    }

    /// Purge expired tranches of `account`, shrinking its balance and the
    /// supply by the amount removed.
    fn sync_expiry(
        &mut self,
        account: AccountId,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> u128 {
        let Some(record) = self.state.accounts.get_mut(&account) else {
            return 0;
        };
        let burned = record.tranches.purge_expired(now);
        if burned == 0 {
            return 0;
        }
        record.balance -= burned;
        self.state.total_supply -= burned;
        self.state.prune(&account);

        tracing::info!(%account, burned, %now, "expired tranches burned");
        events.push(LedgerEvent::ExpiredBurned {
            account,
            amount: burned,
            at: now,
        });
        events.push(LedgerEvent::Transfer {
            from: account,
            to: AccountId::ZERO,
            amount: burned,
        });
        burned
    }

    /// Shared body of `transfer`, `transfer_from` and `burn`.
    /// A null `to` burns instead of crediting.
    fn move_balance(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: u128,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let available = self.active_balance_of(from, now);
        if available < amount {
            tracing::debug!(%from, needed = amount, available, "transfer rejected");
            return Err(LedgerError::InsufficientActiveBalance {
                needed: amount,
                available,
            });
        }

        self.sync_expiry(from, now, events);
        if !to.is_zero() {
            self.sync_expiry(to, now, events);
        }

        if amount > 0 {
            let source = self.state.account_mut(from);
            let taken = source
                .tranches
                .consume(amount, now)
                .ok_or(LedgerError::InsufficientActiveBalance {
                    needed: amount,
                    available,
                })?;
            source.balance -= amount;

            if to.is_zero() {
                self.state.total_supply -= amount;
            } else {
                let dest = self.state.account_mut(to);
                for slice in &taken {
                    dest.tranches.credit(slice.amount, slice.expires_at);
                }
                dest.balance += amount;
            }
            self.state.prune(&from);
            tracing::debug!(%from, %to, amount, slices = taken.len(), "tranches moved");
        }

        events.push(LedgerEvent::Transfer { from, to, amount });
        Ok(())
    }
}
