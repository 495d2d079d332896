//! Tranche ledger for a time-limited ("flash") BEP20-style token.
//!
//! Every minted balance carries an expiry. The ledger tracks per-account
//! tranches of `(amount, expires_at)`, refuses to move expired value, burns
//! expired tranches whenever an account is touched (or when anyone asks), and
//! keeps balances and total supply equal to the tranche sums throughout.
//!
//! Time is always supplied by the caller; nothing here reads a clock.

pub mod engine;
pub mod error;
pub mod event;
pub mod snapshot;
pub mod state;
pub mod tranche;

pub use engine::TrancheLedger;
pub use error::{ErrorKind, LedgerError};
pub use event::{EventBus, LedgerEvent};
pub use snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
pub use state::{Account, LedgerState};
pub use tranche::{Tranche, TrancheBook};
