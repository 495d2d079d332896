//! Caller-side helpers for the flash token ledger.
//!
//! Everything a minting desk or holder needs around the ledger itself: which
//! mint form a deployed contract exposes, how to encode the call, a readable
//! summary of an account's tranches, and a log of submitted operations.

pub mod abi;
pub mod error;
pub mod history;
pub mod portfolio;

pub use abi::{build_mint_call, detect_mint_signature, function_selector, MintCall, MintSignature};
pub use error::ClientError;
pub use history::{TxDetails, TxHistory, TxKind, TxRecord, TxStatus};
pub use portfolio::{FlashHolding, PortfolioSummary};
