//! Ledger snapshots, the persisted form of the whole ledger state.
//!
//! A snapshot is the bincode encoding of [`LedgerState`] plus a version tag
//! and the time it was taken. Decoding re-checks the bookkeeping invariants so
//! a corrupted or hand-edited file is rejected instead of loaded.

use flash_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::state::LedgerState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Snapshot version for compatibility.
    pub version: u32,
    /// When the snapshot was taken.
    pub taken_at: Timestamp,
    pub state: LedgerState,
}

impl LedgerSnapshot {
    pub fn new(state: LedgerState, taken_at: Timestamp) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            taken_at,
            state,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::Serialization(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        if !snapshot.state.is_consistent() {
            return Err(LedgerError::Serialization(
                "snapshot balances do not match tranches".into(),
            ));
        }
        Ok(snapshot)
    }
}
