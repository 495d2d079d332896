//! Nullable infrastructure for deterministic testing.
//!
//! The ledger takes the current time as an argument on every call. Tests and
//! dry runs drive that argument from a [`NullClock`] instead of the wall clock,
//! so expiry can be crossed on demand.

pub mod clock;

pub use clock::{Clock, NullClock, SystemClock};
