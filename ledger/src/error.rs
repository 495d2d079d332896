//! Ledger-level errors.

use flash_types::{AccountId, Timestamp};
use thiserror::Error;

/// Broad class of a ledger failure. None of them are retryable as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller must fix its input.
    Validation,
    /// The caller lacks the required role.
    Authorization,
    /// The caller needs more active balance or allowance.
    InsufficientBalance,
    /// Host-side failure (state encoding).
    Environment,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{role} must not be the null account")]
    NullAccount { role: &'static str },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("expiry {expires_at} is not after current time {now}")]
    ExpiryNotInFuture { expires_at: Timestamp, now: Timestamp },

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("caller {caller} is not the minting authority")]
    Unauthorized { caller: AccountId },

    #[error("insufficient active balance: need {needed}, have {available}")]
    InsufficientActiveBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("state serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullAccount { .. }
            | Self::ZeroAmount
            | Self::ExpiryNotInFuture { .. }
            | Self::Overflow(_) => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InsufficientActiveBalance { .. } | Self::InsufficientAllowance { .. } => {
                ErrorKind::InsufficientBalance
            }
            Self::Serialization(_) => ErrorKind::Environment,
        }
    }
}
