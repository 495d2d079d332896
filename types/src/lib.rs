//! Fundamental types for the flash token ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, timestamps, token parameters, and the parse error type.
//! Amounts are raw `u128` values at token precision.

pub mod address;
pub mod error;
pub mod params;
pub mod time;

pub use address::AccountId;
pub use error::TypeError;
pub use params::TokenParams;
pub use time::Timestamp;
