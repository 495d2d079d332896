#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, and anything accepted must
    // satisfy the bookkeeping invariants.
    if let Ok(snapshot) = flash_ledger::LedgerSnapshot::decode(data) {
        assert!(snapshot.state.is_consistent());
    }

    let _ = bincode::deserialize::<flash_types::Timestamp>(data);
    let _ = bincode::deserialize::<flash_types::AccountId>(data);
});
