//! Errors raised while parsing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
