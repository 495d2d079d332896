//! Ledger subcommands and their execution against a loaded ledger.

use clap::Subcommand;
use flash_client::{PortfolioSummary, TxDetails, TxKind};
use flash_ledger::{LedgerError, TrancheLedger};
use flash_types::{AccountId, Timestamp};
use serde_json::{json, Value};

/// One ledger operation per invocation.
#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum LedgerCommand {
    /// Mint a time-limited balance (minting authority only).
    Mint {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        to: AccountId,
        #[arg(long)]
        amount: u128,
        /// Absolute expiry in Unix seconds.
        #[arg(long, conflicts_with = "ttl")]
        expires_at: Option<u64>,
        /// Lifetime in seconds from now.
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Move active balance from the caller to another account.
    Transfer {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        to: AccountId,
        #[arg(long)]
        amount: u128,
    },
    /// Move active balance on behalf of an owner, spending allowance.
    TransferFrom {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        from: AccountId,
        #[arg(long)]
        to: AccountId,
        #[arg(long)]
        amount: u128,
    },
    /// Set a spender's allowance.
    Approve {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        spender: AccountId,
        #[arg(long)]
        amount: u128,
    },
    /// Destroy some of the caller's active balance.
    Burn {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        amount: u128,
    },
    /// Burn the expired tranches of one account (anyone may call).
    BurnExpired {
        #[arg(long)]
        account: AccountId,
    },
    /// Burn expired tranches across several accounts.
    Sweep {
        #[arg(long, value_delimiter = ',', required = true)]
        accounts: Vec<AccountId>,
    },
    /// Show balances and tranches of an account.
    Balance {
        #[arg(long)]
        account: AccountId,
    },
    /// Show total supply and token metadata.
    Supply,
    /// Set the metadata URI (minting authority only).
    SetMetadata {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        uri: String,
    },
    /// Hand the minting authority to another account.
    TransferOwnership {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        new_owner: AccountId,
    },
}

/// Resolve a mint expiry from `--expires-at`, `--ttl`, or the configured default.
pub fn resolve_expiry(
    expires_at: Option<u64>,
    ttl: Option<u64>,
    now: Timestamp,
    default_ttl_secs: u64,
) -> Timestamp {
    match (expires_at, ttl) {
        (Some(at), _) => Timestamp::new(at),
        (None, Some(ttl)) => now.saturating_add(ttl),
        (None, None) => now.saturating_add(default_ttl_secs),
    }
}

impl LedgerCommand {
    /// Whether the command changes ledger state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Balance { .. } | Self::Supply)
    }

    /// What to write into the submitted-transaction history, if anything.
    pub fn history_entry(&self, now: Timestamp, default_ttl_secs: u64) -> Option<(TxKind, TxDetails)> {
        let entry = match self {
            Self::Mint {
                caller,
                to,
                amount,
                expires_at,
                ttl,
            } => (
                TxKind::Mint,
                TxDetails {
                    caller: Some(*caller),
                    counterparty: Some(*to),
                    amount: Some(*amount),
                    expires_at: Some(resolve_expiry(*expires_at, *ttl, now, default_ttl_secs)),
                    expiry_enforced: true,
                },
            ),
            Self::Transfer { caller, to, amount } => (
                TxKind::Transfer,
                TxDetails {
                    caller: Some(*caller),
                    counterparty: Some(*to),
                    amount: Some(*amount),
                    ..Default::default()
                },
            ),
            Self::TransferFrom {
                caller, to, amount, ..
            } => (
                TxKind::TransferFrom,
                TxDetails {
                    caller: Some(*caller),
                    counterparty: Some(*to),
                    amount: Some(*amount),
                    ..Default::default()
                },
            ),
            Self::Approve {
                caller,
                spender,
                amount,
            } => (
                TxKind::Approve,
                TxDetails {
                    caller: Some(*caller),
                    counterparty: Some(*spender),
                    amount: Some(*amount),
                    ..Default::default()
                },
            ),
            Self::Burn { caller, amount } => (
                TxKind::Burn,
                TxDetails {
                    caller: Some(*caller),
                    amount: Some(*amount),
                    ..Default::default()
                },
            ),
            Self::BurnExpired { account } => (
                TxKind::BurnExpired,
                TxDetails {
                    counterparty: Some(*account),
                    ..Default::default()
                },
            ),
            Self::Sweep { .. } => (TxKind::Sweep, TxDetails::default()),
            Self::SetMetadata { caller, .. } => (
                TxKind::SetMetadata,
                TxDetails {
                    caller: Some(*caller),
                    ..Default::default()
                },
            ),
            Self::TransferOwnership { caller, new_owner } => (
                TxKind::TransferOwnership,
                TxDetails {
                    caller: Some(*caller),
                    counterparty: Some(*new_owner),
                    ..Default::default()
                },
            ),
            Self::Balance { .. } | Self::Supply => return None,
        };
        Some(entry)
    }

    /// Run the command and describe the result as JSON.
    pub fn execute(
        &self,
        ledger: &mut TrancheLedger,
        now: Timestamp,
        default_ttl_secs: u64,
    ) -> Result<Value, LedgerError> {
        let out = match self {
            Self::Mint {
                caller,
                to,
                amount,
                expires_at,
                ttl,
            } => {
                let expires_at = resolve_expiry(*expires_at, *ttl, now, default_ttl_secs);
                ledger.mint(*caller, *to, *amount, expires_at, now)?;
                json!({ "minted": amount.to_string(), "to": to, "expires_at": expires_at.as_secs() })
            }
            Self::Transfer { caller, to, amount } => {
                ledger.transfer(*caller, *to, *amount, now)?;
                json!({ "transferred": amount.to_string(), "from": caller, "to": to })
            }
            Self::TransferFrom {
                caller,
                from,
                to,
                amount,
            } => {
                ledger.transfer_from(*caller, *from, *to, *amount, now)?;
                json!({
                    "transferred": amount.to_string(),
                    "from": from,
                    "to": to,
                    "remaining_allowance": ledger.allowance(*from, *caller).to_string(),
                })
            }
            Self::Approve {
                caller,
                spender,
                amount,
            } => {
                ledger.approve(*caller, *spender, *amount)?;
                json!({ "owner": caller, "spender": spender, "allowance": amount.to_string() })
            }
            Self::Burn { caller, amount } => {
                ledger.burn(*caller, *amount, now)?;
                json!({ "burned": amount.to_string(), "from": caller })
            }
            Self::BurnExpired { account } => {
                let burned = ledger.burn_expired(*account, now);
                json!({ "account": account, "burned": burned.to_string() })
            }
            Self::Sweep { accounts } => {
                let burned = ledger.sweep_expired(accounts, now);
                json!({ "accounts": accounts.len(), "burned": burned.to_string() })
            }
            Self::Balance { account } => {
                let summary = PortfolioSummary::of(ledger, *account, now);
                let tranches: Vec<Value> = summary
                    .holdings
                    .iter()
                    .map(|h| {
                        json!({
                            "amount": h.amount.to_string(),
                            "expires_at": h.expires_at.as_secs(),
                            "expires": h.expires_in,
                        })
                    })
                    .collect();
                json!({
                    "account": account,
                    "balance": ledger.balance_of(*account).to_string(),
                    "active": summary.active.to_string(),
                    "expired": summary.expired.to_string(),
                    "next_expiry": summary.next_expiry.map(|t| t.as_secs()),
                    "tranches": tranches,
                })
            }
            Self::Supply => json!({
                "name": ledger.name(),
                "symbol": ledger.symbol(),
                "decimals": ledger.decimals(),
                "owner": ledger.get_owner(),
                "metadata_uri": ledger.metadata_uri(),
                "total_supply": ledger.total_supply().to_string(),
            }),
            Self::SetMetadata { caller, uri } => {
                ledger.set_metadata_uri(*caller, uri.clone())?;
                json!({ "metadata_uri": uri })
            }
            Self::TransferOwnership { caller, new_owner } => {
                ledger.transfer_ownership(*caller, *new_owner)?;
                json!({ "previous_owner": caller, "owner": new_owner })
            }
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flash_types::TokenParams;

    fn addr(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    fn ledger() -> TrancheLedger {
        TrancheLedger::new(addr(1), TokenParams::default())
    }

    #[test]
    fn expiry_resolution_prefers_explicit_then_ttl_then_default() {
        let now = Timestamp::new(1_000);
        assert_eq!(resolve_expiry(Some(5), Some(9), now, 60), Timestamp::new(5));
        assert_eq!(resolve_expiry(None, Some(9), now, 60), Timestamp::new(1_009));
        assert_eq!(resolve_expiry(None, None, now, 60), Timestamp::new(1_060));
    }

    #[test]
    fn mint_then_balance_reports_tranche() {
        let mut l = ledger();
        let now = Timestamp::new(1_000);
        let mint = LedgerCommand::Mint {
            caller: addr(1),
            to: addr(2),
            amount: 100,
            expires_at: None,
            ttl: Some(3_600),
        };
        mint.execute(&mut l, now, 60).unwrap();

        let out = LedgerCommand::Balance { account: addr(2) }
            .execute(&mut l, now, 60)
            .unwrap();
        assert_eq!(out["active"], "100");
        assert_eq!(out["next_expiry"], 4_600);
        assert_eq!(out["tranches"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn rejected_operation_surfaces_ledger_error() {
        let mut l = ledger();
        let err = LedgerCommand::Transfer {
            caller: addr(2),
            to: addr(3),
            amount: 1,
        }
        .execute(&mut l, Timestamp::new(1), 60)
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientActiveBalance { .. }));
    }

    #[test]
    fn read_only_commands_have_no_history() {
        assert!(!LedgerCommand::Supply.is_mutating());
        assert!(LedgerCommand::Supply
            .history_entry(Timestamp::new(0), 60)
            .is_none());
        let sweep = LedgerCommand::Sweep {
            accounts: vec![addr(2)],
        };
        assert!(sweep.is_mutating());
        assert_eq!(
            sweep.history_entry(Timestamp::new(0), 60).map(|(k, _)| k),
            Some(TxKind::Sweep)
        );
    }

    #[test]
    fn sweep_reports_total_burned() {
        let mut l = ledger();
        let t0 = Timestamp::new(0);
        l.mint(addr(1), addr(2), 5, Timestamp::new(10), t0).unwrap();
        l.mint(addr(1), addr(3), 7, Timestamp::new(10), t0).unwrap();
        let out = LedgerCommand::Sweep {
            accounts: vec![addr(2), addr(3)],
        }
        .execute(&mut l, Timestamp::new(10), 60)
        .unwrap();
        assert_eq!(out["burned"], "12");
        assert_eq!(l.total_supply(), 0);
    }
}
