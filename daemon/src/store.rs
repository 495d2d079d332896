//! Ledger snapshot file I/O.

use std::path::Path;

use anyhow::Context;
use flash_ledger::{LedgerSnapshot, TrancheLedger};
use flash_types::Timestamp;

/// Load the ledger from its snapshot file.
pub fn load_ledger(path: &Path) -> anyhow::Result<TrancheLedger> {
    let bytes = std::fs::read(path).with_context(|| {
        format!(
            "reading ledger state {} (run `flashd init` first)",
            path.display()
        )
    })?;
    let snapshot = LedgerSnapshot::decode(&bytes)
        .with_context(|| format!("decoding ledger state {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        taken_at = %snapshot.taken_at,
        accounts = snapshot.state.accounts.len(),
        "ledger state loaded"
    );
    Ok(TrancheLedger::restore(snapshot))
}

/// Write the ledger snapshot, replacing the file only once the new bytes are
/// fully on disk.
pub fn save_ledger(ledger: &TrancheLedger, path: &Path, now: Timestamp) -> anyhow::Result<()> {
    let bytes = ledger.snapshot(now).encode()?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "ledger state saved");
    Ok(())
}
