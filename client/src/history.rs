//! Submitted transaction history.
//!
//! Every ledger operation an operator submits is recorded as `Pending` and
//! later resolved to `Confirmed` or `Failed`. The history is stored as a
//! pretty-printed JSON document next to the ledger state.

use std::path::Path;

use flash_types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Mint,
    Transfer,
    TransferFrom,
    Approve,
    Burn,
    BurnExpired,
    Sweep,
    SetMetadata,
    TransferOwnership,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed { reason: String },
}

/// What was submitted, before it gets an id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxDetails {
    pub caller: Option<AccountId>,
    pub counterparty: Option<AccountId>,
    pub amount: Option<u128>,
    pub expires_at: Option<Timestamp>,
    /// Whether the ledger enforces `expires_at` for this operation.
    #[serde(default)]
    pub expiry_enforced: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub id: u64,
    pub kind: TxKind,
    pub submitted_at: Timestamp,
    pub details: TxDetails,
    pub status: TxStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHistory {
    next_id: u64,
    records: Vec<TxRecord>,
}

impl TxHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission and return its id.
    pub fn record_submitted(&mut self, kind: TxKind, details: TxDetails, now: Timestamp) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(TxRecord {
            id,
            kind,
            submitted_at: now,
            details,
            status: TxStatus::Pending,
        });
        id
    }

    pub fn mark_confirmed(&mut self, id: u64) -> Result<(), ClientError> {
        self.set_status(id, TxStatus::Confirmed)
    }

    pub fn mark_failed(&mut self, id: u64, reason: impl Into<String>) -> Result<(), ClientError> {
        self.set_status(id, TxStatus::Failed {
            reason: reason.into(),
        })
    }

    fn set_status(&mut self, id: u64, status: TxStatus) -> Result<(), ClientError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ClientError::UnknownTx(id))?;
        record.status = status;
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&TxRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[TxRecord] {
        &self.records
    }

    pub fn pending(&self) -> impl Iterator<Item = &TxRecord> {
        self.records
            .iter()
            .filter(|r| r.status == TxStatus::Pending)
    }

    /// Load history from `path`; a missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
